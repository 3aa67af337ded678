//! Remote serial command interface
//!
//! Single-byte commands arrive over the serial link. Every byte is echoed,
//! and five of them drive the robot:
//!
//! | Byte | Command |
//! |------|---------|
//! | `8`  | forward jog |
//! | `2`  | back jog |
//! | `4`  | left jog |
//! | `6`  | right jog |
//! | `7`  | return to origin |

pub mod command;
pub mod interpreter;
pub mod link;

pub use command::RemoteCommand;
pub use link::RemoteLink;
