//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `serve`         | `Serve`                                            |
//! | `question`      | `Question`                                         |
//! | `session`       | `Start`, `Status`, `Note`, `Evaluate`, `Hint`, `End` |
//! | `config`        | `Config`                                           |

pub mod config;
pub mod question;
pub mod serve;
pub mod session;

pub use config::cmd_config;
pub use question::cmd_question;
pub use serve::cmd_serve;
pub use session::{cmd_end, cmd_evaluate, cmd_hint, cmd_note, cmd_start, cmd_status};
