//! Command execution abstraction for testability
//!
//! Every external tool the backup path touches (container runtime, cluster
//! exec, dump utilities, `du`) goes through `CommandExecutor`, so the
//! adapter, size inspector and orchestrator run against `MockExecutor` in
//! tests without spawning processes.

use anyhow::Result;
use std::process::Output;

/// Abstraction for command execution, enabling mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Run a command with extra environment and optional stdin
    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
        stdin: Option<&[u8]>,
    ) -> Result<Output>;

    /// Run a command and return stdout as string
    fn run_command_stdout(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = self.run_command(program, args, &[], None)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Default implementation using real subprocess calls
#[derive(Debug, Clone, Default)]
pub struct RealExecutor;

impl RealExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for RealExecutor {
    fn run_command(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
        stdin: Option<&[u8]>,
    ) -> Result<Output> {
        super::command::run_command(program, args, envs, stdin)
    }
}

/// A mock executor for testing that records calls and returns configured responses
/// Available for use in external test crates
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Recorded command invocation
    #[derive(Clone, Debug)]
    pub struct CommandCall {
        pub program: String,
        pub args: Vec<String>,
        /// Names of injected environment variables (values are not kept)
        pub env_keys: Vec<String>,
        pub stdin: Option<Vec<u8>>,
    }

    impl CommandCall {
        pub fn has_arg(&self, arg: &str) -> bool {
            self.args.iter().any(|a| a == arg)
        }

        /// Program and arguments joined with spaces
        pub fn command_line(&self) -> String {
            std::iter::once(self.program.as_str())
                .chain(self.args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Response configuration for mock
    #[derive(Clone, Debug)]
    pub enum MockResponse {
        Success { stdout: String, stderr: String },
        Failure { stderr: String, exit_code: i32 },
    }

    impl MockResponse {
        pub fn stdout(stdout: &str) -> Self {
            MockResponse::Success {
                stdout: stdout.to_string(),
                stderr: String::new(),
            }
        }

        pub fn failure(stderr: &str) -> Self {
            MockResponse::Failure {
                stderr: stderr.to_string(),
                exit_code: 1,
            }
        }
    }

    impl Default for MockResponse {
        fn default() -> Self {
            MockResponse::Success {
                stdout: String::new(),
                stderr: String::new(),
            }
        }
    }

    #[derive(Clone, Debug)]
    struct Expectation {
        program: String,
        /// When set, the call must carry this exact argument
        arg: Option<String>,
        response: MockResponse,
    }

    /// Mock executor for testing
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        /// Recorded command invocations
        pub calls: Arc<Mutex<Vec<CommandCall>>>,
        expectations: Arc<Mutex<Vec<Expectation>>>,
        /// Default response when no specific response is configured
        default_response: Arc<Mutex<MockResponse>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Configure a response for a specific program
        pub fn expect(self, program: &str, response: MockResponse) -> Self {
            self.push(program, None, response);
            self
        }

        /// Configure a response for calls to `program` that carry `arg`
        ///
        /// Argument-specific responses win over program-wide ones, which is
        /// how the phases of a staged export are told apart.
        pub fn expect_with_arg(self, program: &str, arg: &str, response: MockResponse) -> Self {
            self.push(program, Some(arg.to_string()), response);
            self
        }

        /// Set the default response for unconfigured programs
        pub fn with_default_response(self, response: MockResponse) -> Self {
            *self.default_response.lock().unwrap() = response;
            self
        }

        /// Get all recorded calls
        pub fn get_calls(&self) -> Vec<CommandCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Check if a program was called
        pub fn was_called(&self, program: &str) -> bool {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.program == program)
        }

        /// Get number of calls to a specific program
        pub fn call_count(&self, program: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.program == program)
                .count()
        }

        /// Calls to `program` carrying `arg`
        pub fn calls_with_arg(&self, program: &str, arg: &str) -> Vec<CommandCall> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.program == program && c.has_arg(arg))
                .cloned()
                .collect()
        }

        fn push(&self, program: &str, arg: Option<String>, response: MockResponse) {
            self.expectations.lock().unwrap().push(Expectation {
                program: program.to_string(),
                arg,
                response,
            });
        }

        fn record_call(
            &self,
            program: &str,
            args: &[&str],
            envs: &[(&str, &str)],
            stdin: Option<&[u8]>,
        ) {
            self.calls.lock().unwrap().push(CommandCall {
                program: program.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
                env_keys: envs.iter().map(|(k, _)| k.to_string()).collect(),
                stdin: stdin.map(|s| s.to_vec()),
            });
        }

        fn get_response(&self, program: &str, args: &[&str]) -> MockResponse {
            let expectations = self.expectations.lock().unwrap();
            let with_arg = expectations.iter().find(|e| {
                e.program == program
                    && e.arg.as_deref().is_some_and(|arg| args.contains(&arg))
            });
            let program_wide = || {
                expectations
                    .iter()
                    .find(|e| e.program == program && e.arg.is_none())
            };

            with_arg
                .or_else(program_wide)
                .map(|e| e.response.clone())
                .unwrap_or_else(|| self.default_response.lock().unwrap().clone())
        }

        fn execute_response(&self, response: MockResponse) -> Result<Output> {
            match response {
                MockResponse::Success { stdout, stderr } => Ok(Output {
                    status: std::process::ExitStatus::default(),
                    stdout: stdout.into_bytes(),
                    stderr: stderr.into_bytes(),
                }),
                MockResponse::Failure { stderr, exit_code } => {
                    anyhow::bail!("Command failed with exit code {:?}: {}", exit_code, stderr)
                }
            }
        }
    }

    impl CommandExecutor for MockExecutor {
        fn run_command(
            &self,
            program: &str,
            args: &[&str],
            envs: &[(&str, &str)],
            stdin: Option<&[u8]>,
        ) -> Result<Output> {
            self.record_call(program, args, envs, stdin);
            let response = self.get_response(program, args);
            self.execute_response(response)
        }
    }
}
