//! MOSS line protocol and submission state machine.
//!
//! # Message Flow
//!
//! ```text
//! Client                                   MOSS server
//!    |                                          |
//!    |-- moss <userId> ----------------------->|
//!    |-- directory / X / maxmatches / show --->|  Preamble, fixed order
//!    |-- language <tag> ---------------------->|
//!    |                                          |
//!    |<-------------------------- yes | no ----|  Accept or decline
//!    |                                          |
//!    |-- file 0 <tag> <len> <desc> + body ---->|  Base files (all id 0)
//!    |-- file k <tag> <len> <desc> + body ---->|  Submissions, k = 1..N
//!    |-- query 0 <comment> ------------------->|
//!    |                                          |
//!    |<------------------- http://moss...  ----|  Result location
//!    |-- end --------------------------------->|
//! ```
//!
//! ## State Machine
//!
//! | State               | Leaves on                 | Next               |
//! |---------------------|---------------------------|--------------------|
//! | `Connecting`        | preamble written          | `AwaitingHandshake`|
//! | `AwaitingHandshake` | `yes`                     | `Uploading`        |
//! | `Uploading`         | `query` written           | `AwaitingResult`   |
//! | `AwaitingResult`    | result location, `end`    | `Closed`           |
//! | any                 | `no`                      | `Closed`           |

mod language;
mod message;
mod options;
mod session;

pub use language::Language;
pub use message::{Command, Response};
pub use options::{SubmissionOptions, DEFAULT_IGNORE_LIMIT, DEFAULT_SHOW_MATCHES};
pub use session::{Session, SessionState, SessionStats, Transition, BASE_FILE_ID};
