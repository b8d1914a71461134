//! Submission client.
//!
//! [`MossClient`] collects the option set and the files to upload, then
//! [`MossClient::process`] runs one [`Session`] over a fresh connection:
//!
//! 1. write the preamble and wait for `yes`/`no`
//! 2. upload every base file as id 0, then every submission file as 1..N
//! 3. write `query`, wait for the result location, write `end`
//!
//! Files that cannot be read at upload time are skipped and reported in
//! [`Submission::skipped`]; they never consume a file id.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::time::Instant;
use tracing::Instrument;

use crate::codec::FileRecord;
use crate::config::ClientConfig;
use crate::error::{MossError, Result};
use crate::files::{FileDescriptor, FileRole, SkippedFile};
use crate::protocol::{
    Language, Response, Session, SessionStats, SubmissionOptions, Transition,
};
use crate::transport::{TcpTransport, Transport};

/// Outcome of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    /// Report location returned by the server: the full result line
    /// without its line terminator
    pub url: String,
    /// Files that could not be read and were left out of the batch
    pub skipped: Vec<SkippedFile>,
    /// Session statistics at completion
    pub stats: SessionStats,
}

/// MOSS submission client
#[derive(Debug, Clone)]
pub struct MossClient {
    config: ClientConfig,
    user_id: String,
    options: SubmissionOptions,
    base_files: Vec<FileDescriptor>,
    files: Vec<FileDescriptor>,
}

impl MossClient {
    /// Create a client for `language`.
    ///
    /// Fails with [`MossError::Config`] if the language is not one the
    /// service accepts; nothing touches the network.
    pub fn new(language: &str, user_id: impl Into<String>) -> Result<Self> {
        let language: Language = language.parse()?;
        Ok(Self::with_language(language, user_id))
    }

    /// Create a client for an already-validated language.
    pub fn with_language(language: Language, user_id: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::default(),
            user_id: user_id.into(),
            options: SubmissionOptions::new(language),
            base_files: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Use `config` for the endpoint and timeouts.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Current option set
    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Comment attached to the report
    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.options.comment = comment.into();
        self
    }

    /// Number of matching files to show in the report (default 250)
    pub fn set_num_matching_files(&mut self, num: u32) -> &mut Self {
        self.options.show = num;
        self
    }

    /// Passages appearing in more than `limit` programs are treated as
    /// shared code and never reported (default 10).
    pub fn set_ignore_limit(&mut self, limit: u32) -> &mut Self {
        self.options.ignore_limit = limit;
        self
    }

    /// Group submissions by directory
    pub fn set_directory_mode(&mut self, on: bool) -> &mut Self {
        self.options.directory = on;
        self
    }

    /// Use the server's experimental matcher
    pub fn set_experimental(&mut self, on: bool) -> &mut Self {
        self.options.experimental = on;
        self
    }

    /// Register a base file; matches against it are never reported.
    pub fn add_base_file(
        &mut self,
        path: impl Into<PathBuf>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        self.base_files.push(FileDescriptor::base(path, description)?);
        Ok(self)
    }

    /// Register a submission file read from disk at upload time.
    pub fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        self.files.push(FileDescriptor::submission(path, description)?);
        Ok(self)
    }

    /// Register a submission from in-memory content.
    pub fn add_raw_file(
        &mut self,
        content: impl Into<Bytes>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        self.files.push(FileDescriptor::raw(content, description)?);
        Ok(self)
    }

    /// Registered base files, in upload order
    pub fn base_files(&self) -> &[FileDescriptor] {
        &self.base_files
    }

    /// Registered submission files, in upload order
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Submit over TCP to the configured server.
    pub async fn process(self) -> Result<Submission> {
        let transport = TcpTransport::from_config(&self.config.server, &self.config.timeouts);
        self.process_with(&transport).await
    }

    /// Submit over `transport`.
    ///
    /// Consumes the client, freezing the option set. Options and timeouts
    /// are validated before the transport is asked for a connection.
    pub async fn process_with<T: Transport>(self, transport: &T) -> Result<Submission> {
        let Self {
            config,
            user_id,
            options,
            base_files,
            files,
        } = self;

        config.timeouts.validate()?;
        let session = Session::new(user_id, options)?;
        let span = tracing::info_span!("moss_submission", session_id = %session.id());

        async move {
            let stream = transport.connect().await?;
            tracing::info!(
                "Connected to MOSS server @ {} ({})",
                transport.remote_addr(),
                transport.name()
            );

            let driver = SessionDriver {
                session,
                result_prefix: config.server.result_prefix,
                response_timeout: config.timeouts.response(),
            };
            driver.run(stream, &base_files, &files).await
        }
        .instrument(span)
        .await
    }
}

/// Runs a [`Session`] against a connected stream.
struct SessionDriver {
    session: Session,
    result_prefix: String,
    response_timeout: Duration,
}

impl SessionDriver {
    async fn run<S>(
        mut self,
        stream: S,
        base_files: &[FileDescriptor],
        files: &[FileDescriptor],
    ) -> Result<Submission>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut reader = BufReader::new(reader);

        let result = self.drive(&mut reader, &mut writer, base_files, files).await;
        if result.is_err() {
            self.session.abort();
        }
        result
    }

    async fn drive<R, W>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        base_files: &[FileDescriptor],
        files: &[FileDescriptor],
    ) -> Result<Submission>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let preamble = self.session.preamble()?;
        let deadline = Instant::now() + self.response_timeout;
        self.within(deadline, "preamble write", async {
            for command in &preamble {
                tracing::debug!("-> {}", command);
                writer.write_all(command.encode().as_bytes()).await?;
            }
            writer.flush().await?;
            Ok(())
        })
        .await?;

        let mut skipped = Vec::new();
        let mut deadline = Instant::now() + self.response_timeout;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::time::timeout_at(deadline, reader.read_until(b'\n', &mut buf))
                .await
                .map_err(|_| self.timeout_error(self.session.waiting_for()))??;

            if read == 0 {
                return Err(MossError::Protocol(format!(
                    "Connection closed by server while waiting for {}",
                    self.session.waiting_for()
                )));
            }

            let line = String::from_utf8_lossy(&buf);
            tracing::debug!("<- {:?}", line);

            match self.session.handle(Response::parse(&line, &self.result_prefix))? {
                Transition::BeginUpload => {
                    tracing::info!("Submission accepted, uploading files");
                    let upload_deadline = Instant::now() + self.response_timeout;
                    skipped = match tokio::time::timeout_at(
                        upload_deadline,
                        self.upload_batch(writer, base_files, files),
                    )
                    .await
                    {
                        Ok(result) => result?,
                        Err(_) => return Err(self.timeout_error("upload")),
                    };
                    deadline = Instant::now() + self.response_timeout;
                },
                Transition::Complete(url) => {
                    tracing::info!("Result received: {}", url);
                    let end = self.session.close();
                    let end_deadline = Instant::now() + self.response_timeout;
                    self.within(end_deadline, "end write", async {
                        writer.write_all(end.encode().as_bytes()).await?;
                        writer.flush().await?;
                        writer.shutdown().await?;
                        Ok(())
                    })
                    .await?;

                    return Ok(Submission {
                        url,
                        skipped,
                        stats: self.session.stats(),
                    });
                },
                Transition::Ignored(other) => {
                    tracing::warn!("Ignoring unexpected line from server: {:?}", other);
                },
            }
        }
    }

    /// Run a write phase that must finish before `deadline`.
    async fn within<F>(&self, deadline: Instant, phase: &str, fut: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<()>>,
    {
        tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| self.timeout_error(phase))?
    }

    fn timeout_error(&self, waiting_for: &str) -> MossError {
        MossError::Timeout {
            waiting_for: waiting_for.to_string(),
            secs: self.response_timeout.as_secs(),
        }
    }

    /// Base files (id 0), then submissions (1..N), then `query`.
    async fn upload_batch<W>(
        &mut self,
        writer: &mut W,
        base_files: &[FileDescriptor],
        files: &[FileDescriptor],
    ) -> Result<Vec<SkippedFile>>
    where
        W: AsyncWrite + Unpin,
    {
        let mut skipped = Vec::new();

        for file in base_files.iter().chain(files) {
            let raw = match file.source.load().await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} file {:?} ({}): {}",
                        role_name(file.role),
                        file.description,
                        file.source,
                        e
                    );
                    skipped.push(SkippedFile {
                        description: file.description.clone(),
                        role: file.role,
                        reason: e.to_string(),
                    });
                    continue;
                },
            };

            let record = FileRecord::from_raw(raw);
            let header = match file.role {
                FileRole::Base => self
                    .session
                    .base_file_header(&file.description, record.len())?,
                FileRole::Submission => self
                    .session
                    .submission_file_header(&file.description, record.len())?,
            };
            tracing::debug!("-> {}", header);
            writer.write_all(&record.encode(&header)).await?;
        }

        let query = self.session.finish_upload()?;
        tracing::debug!("-> {}", query);
        writer.write_all(query.encode().as_bytes()).await?;
        writer.flush().await?;

        let stats = self.session.stats();
        tracing::info!(
            "Uploaded {} base and {} submission files ({} bytes), {} skipped",
            stats.base_files,
            stats.submission_files,
            stats.bytes_uploaded,
            skipped.len()
        );
        Ok(skipped)
    }
}

fn role_name(role: FileRole) -> &'static str {
    match role {
        FileRole::Base => "base",
        FileRole::Submission => "submission",
    }
}
