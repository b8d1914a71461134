//! Session state machine for a single MOSS submission.
//!
//! The session performs no I/O. It decides which lines go out next and how
//! each inbound [`Response`] moves the submission forward; the client in
//! [`crate::client`] owns the socket and follows its lead.

use std::time::Instant;

use serde::Serialize;

use super::message::{Command, Response};
use super::options::SubmissionOptions;
use crate::error::{MossError, Result};

/// File id shared by every base file.
pub const BASE_FILE_ID: u32 = 0;

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Created, preamble not yet written
    Connecting,
    /// Preamble written, waiting for `yes`/`no`
    AwaitingHandshake,
    /// Accepted, file records are being written
    Uploading,
    /// Query written, waiting for the result location
    AwaitingResult,
    /// Terminal
    Closed,
}

/// Outcome of feeding a response into the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Server accepted the preamble; upload the batch now
    BeginUpload,
    /// Server produced the result location
    Complete(String),
    /// Line carried no recognized signal
    Ignored(String),
}

/// One submission attempt. Not reusable.
#[derive(Debug)]
pub struct Session {
    /// Session ID, used for log correlation only
    id: String,
    /// Current state
    state: SessionState,
    /// Registered user id
    user_id: String,
    /// Frozen option set
    options: SubmissionOptions,
    /// Next submission file id
    next_file_id: u32,
    /// Base files written
    base_files: usize,
    /// Submission files written
    submission_files: usize,
    /// Body bytes written
    bytes_uploaded: u64,
    /// Creation time
    started: Instant,
}

impl Session {
    /// Create a session. Options are validated here, before any I/O.
    pub fn new(user_id: impl Into<String>, options: SubmissionOptions) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() || user_id.contains(char::is_whitespace) {
            return Err(MossError::Config(
                "User id must be a non-empty token without whitespace".to_string(),
            ));
        }
        options.validate()?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: SessionState::Connecting,
            user_id,
            options,
            next_file_id: 1,
            base_files: 0,
            submission_files: 0,
            bytes_uploaded: 0,
            started: Instant::now(),
        })
    }

    /// Get session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get the frozen options
    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    /// Human-readable description of what the session is waiting for.
    pub fn waiting_for(&self) -> &'static str {
        match self.state {
            SessionState::AwaitingHandshake => "handshake response",
            SessionState::AwaitingResult => "result location",
            _ => "server response",
        }
    }

    /// Identity and option lines, in the order the server requires.
    pub fn preamble(&mut self) -> Result<Vec<Command>> {
        self.expect_state(SessionState::Connecting, "write preamble")?;
        self.state = SessionState::AwaitingHandshake;

        let opts = &self.options;
        Ok(vec![
            Command::Moss {
                user_id: self.user_id.clone(),
            },
            Command::Directory(opts.directory),
            Command::Experimental(opts.experimental),
            Command::MaxMatches(opts.ignore_limit),
            Command::Show(opts.show),
            Command::Language(opts.language),
        ])
    }

    /// Feed one classified inbound line into the state machine.
    pub fn handle(&mut self, response: Response) -> Result<Transition> {
        if self.state == SessionState::Closed {
            return Err(MossError::Protocol(format!(
                "Received {:?} on a closed session",
                response
            )));
        }

        match response {
            Response::No => {
                self.state = SessionState::Closed;
                Err(MossError::Rejected(format!(
                    "server answered \"no\" (is language '{}' supported?)",
                    self.options.language
                )))
            },
            Response::Yes => {
                self.expect_state(SessionState::AwaitingHandshake, "accept \"yes\"")?;
                self.state = SessionState::Uploading;
                Ok(Transition::BeginUpload)
            },
            Response::ResultUrl(url) => {
                self.expect_state(SessionState::AwaitingResult, "accept result location")?;
                Ok(Transition::Complete(url))
            },
            Response::Other(line) => Ok(Transition::Ignored(line)),
        }
    }

    /// Header for a base file body of `len` bytes.
    pub fn base_file_header(&mut self, description: &str, len: usize) -> Result<Command> {
        self.expect_state(SessionState::Uploading, "upload base file")?;
        if self.submission_files > 0 {
            return Err(MossError::Protocol(
                "Base files must be uploaded before submission files".to_string(),
            ));
        }
        self.base_files += 1;
        self.bytes_uploaded += len as u64;
        Ok(self.file_header(BASE_FILE_ID, description, len))
    }

    /// Header for the next submission file body of `len` bytes.
    ///
    /// Ids are handed out only when a header is produced, so files that
    /// could not be read never consume one.
    pub fn submission_file_header(&mut self, description: &str, len: usize) -> Result<Command> {
        self.expect_state(SessionState::Uploading, "upload submission file")?;
        let id = self.next_file_id;
        self.next_file_id += 1;
        self.submission_files += 1;
        self.bytes_uploaded += len as u64;
        Ok(self.file_header(id, description, len))
    }

    /// Finish the batch; returns the `query` line.
    pub fn finish_upload(&mut self) -> Result<Command> {
        self.expect_state(SessionState::Uploading, "send query")?;
        self.state = SessionState::AwaitingResult;
        Ok(Command::Query {
            comment: self.options.comment.clone(),
        })
    }

    /// Close after a result; returns the `end` line.
    pub fn close(&mut self) -> Command {
        self.state = SessionState::Closed;
        Command::End
    }

    /// Mark the session dead after an unrecoverable error.
    pub fn abort(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Get session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.id.clone(),
            state: self.state,
            base_files: self.base_files,
            submission_files: self.submission_files,
            bytes_uploaded: self.bytes_uploaded,
            elapsed_secs: self.started.elapsed().as_secs(),
        }
    }

    fn file_header(&self, id: u32, description: &str, len: usize) -> Command {
        Command::File {
            id,
            language: self.options.language,
            len,
            description: description.to_string(),
        }
    }

    fn expect_state(&self, expected: SessionState, action: &str) -> Result<()> {
        if self.state != expected {
            return Err(MossError::Protocol(format!(
                "Cannot {} in state {:?}",
                action, self.state
            )));
        }
        Ok(())
    }
}

/// Session statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Session ID
    pub session_id: String,
    /// Current state
    pub state: SessionState,
    /// Base files written
    pub base_files: usize,
    /// Submission files written
    pub submission_files: usize,
    /// Total body bytes written
    pub bytes_uploaded: u64,
    /// Seconds since the session was created
    pub elapsed_secs: u64,
}
