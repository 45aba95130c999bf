pub mod dump;
pub mod fixture;
pub mod init;
pub mod load;
pub mod new;
pub mod skeleton;
pub mod status;
pub mod tree;

pub use dump::{DumpArgs, cmd_dump};
pub use fixture::{FixtureArgs, cmd_fixture};
pub use init::cmd_init;
pub use load::cmd_load;
pub use new::cmd_new;
pub use skeleton::cmd_skeleton;
pub use status::cmd_status;
pub use tree::{DumpTreeArgs, LoadTreeArgs, cmd_dump_tree, cmd_load_tree};
