//! Stock components: the fixed bundles composed by platform variants
//! plus general-purpose building blocks.

pub mod ignore;
pub mod project_index;
pub mod text_file;
pub mod workflow;

pub use ignore::IgnoreFile;
pub use project_index::ProjectIndex;
pub use text_file::TextFile;
pub use workflow::{GithubWorkflow, GitlabCi};
