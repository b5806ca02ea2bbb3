//! Container runtime and cluster exec wrappers
//!
//! A `Transport` turns a tool argv into the `docker run`, `docker exec` or
//! `kubectl exec` invocation that reaches the database, and provides the
//! copy-out and remove primitives used by staged exports.
//!
//! Passwords never travel in argv. The docker client gets the variable in
//! its own environment and forwards it with a bare `-e NAME`; `kubectl exec`
//! has no such flag, so the value is piped on stdin and exported by a small
//! `sh` prelude inside the pod.

use crate::config::{BackupJob, DatabaseType, ExecutionMethod};
use crate::error::BackupError;
use crate::strategies::Invocation;
use std::path::{Path, PathBuf};

/// Where the host backup directory is mounted inside ephemeral containers
pub const MOUNT_POINT: &str = "/backup";

/// A credential to hand to the remote tool through an environment variable
#[derive(Clone, Copy)]
pub struct Secret<'a> {
    pub var: &'static str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// `docker run --rm` of the engine image with the type directory mounted
    Ephemeral { image: String, mount: PathBuf },
    /// `docker exec` into a running container
    Container { name: String },
    /// `kubectl exec` into a running pod
    Pod { name: String, namespace: String },
}

impl Transport {
    /// Pick the transport for a job, checking that its target is named
    pub fn for_job(
        method: ExecutionMethod,
        db_type: DatabaseType,
        job: &BackupJob,
    ) -> Result<Self, BackupError> {
        let conn = &job.connection;
        match method {
            ExecutionMethod::DockerRun => {
                let type_dir = job.type_dir(db_type);
                let mount = host_path(&type_dir).map_err(|source| BackupError::Directory {
                    path: type_dir.clone(),
                    source,
                })?;
                Ok(Transport::Ephemeral {
                    image: format!("{}:{}", db_type.image(), conn.version),
                    mount,
                })
            }
            ExecutionMethod::DockerExec => {
                require(&conn.container, method, "container", &conn.database)?;
                Ok(Transport::Container {
                    name: conn.container.clone(),
                })
            }
            ExecutionMethod::KubectlExec => {
                require(&conn.pod, method, "pod", &conn.database)?;
                Ok(Transport::Pod {
                    name: conn.pod.clone(),
                    namespace: job.namespace.clone(),
                })
            }
        }
    }

    /// Short description used in failure details ("container app-db")
    pub fn describe(&self) -> String {
        match self {
            Transport::Ephemeral { image, .. } => format!("ephemeral container {}", image),
            Transport::Container { name } => format!("container {}", name),
            Transport::Pod { name, namespace } => format!("pod {}/{}", namespace, name),
        }
    }

    /// Host the dump tool should connect to
    ///
    /// Exec transports run next to the server, so they always use localhost.
    pub fn dump_host<'a>(&self, configured: &'a str) -> &'a str {
        match self {
            Transport::Ephemeral { .. } => configured,
            Transport::Container { .. } | Transport::Pod { .. } => "localhost",
        }
    }

    /// Context attached to a failed single-command backup
    pub fn failure_context(&self) -> &'static str {
        match self {
            Transport::Ephemeral { .. } => "docker run failed",
            Transport::Container { .. } => "docker exec failed",
            Transport::Pod { .. } => "kubectl exec failed",
        }
    }

    /// Wrap a tool argv so it runs at the target
    pub fn exec(&self, argv: &[String], secret: Option<Secret<'_>>) -> Invocation {
        let secret = secret.filter(|s| !s.value.is_empty());

        match self {
            Transport::Ephemeral { image, mount } => {
                let mut inv = Invocation::new("docker").args(["run", "--rm"]);
                if let Some(s) = secret {
                    inv = inv.args(["-e", s.var]).env(s.var, s.value);
                }
                inv.arg("-v")
                    .arg(format!("{}:{}", mount.display(), MOUNT_POINT))
                    .arg(image)
                    .args(argv)
            }
            Transport::Container { name } => {
                let mut inv = Invocation::new("docker").arg("exec");
                if let Some(s) = secret {
                    inv = inv.args(["-e", s.var]).env(s.var, s.value);
                }
                inv.arg(name).args(argv)
            }
            Transport::Pod { name, namespace } => {
                let inv = Invocation::new("kubectl").arg("exec");
                match secret {
                    Some(s) => inv
                        .args(["-i", "-n", namespace.as_str(), name.as_str(), "--", "sh", "-c"])
                        .arg(format!("IFS= read -r {0}; export {0}; exec \"$@\"", s.var))
                        .arg("sh")
                        .args(argv)
                        .stdin(format!("{}\n", s.value).into_bytes()),
                    None => inv
                        .args(["-n", namespace.as_str(), name.as_str(), "--"])
                        .args(argv),
                }
            }
        }
    }

    /// Copy `remote` out of the target so it lands at `local_parent/leaf`
    ///
    /// Ephemeral containers write straight into the mount and have nothing
    /// to copy, so they yield `None`.
    pub fn copy_out(&self, remote: &str, local_parent: &Path, leaf: &str) -> Option<Invocation> {
        match self {
            Transport::Ephemeral { .. } => None,
            // docker cp places a directory inside an existing destination directory
            Transport::Container { name } => Some(
                Invocation::new("docker")
                    .arg("cp")
                    .arg(format!("{}:{}", name, remote))
                    .arg(format!("{}/", local_parent.display())),
            ),
            // kubectl cp copies a directory onto the destination path itself
            Transport::Pod { name, namespace } => Some(
                Invocation::new("kubectl")
                    .arg("cp")
                    .arg(format!("{}/{}:{}", namespace, name, remote))
                    .arg(local_parent.join(leaf).display().to_string()),
            ),
        }
    }

    /// Remove a path inside the target
    pub fn remove(&self, remote: &str) -> Invocation {
        let argv = ["rm".to_string(), "-rf".to_string(), remote.to_string()];
        self.exec(&argv, None)
    }
}

fn require(
    value: &str,
    method: ExecutionMethod,
    field: &'static str,
    database: &str,
) -> Result<(), BackupError> {
    if value.trim().is_empty() {
        return Err(BackupError::MissingTarget {
            method: method.as_str(),
            field,
            database: database.to_string(),
        });
    }
    Ok(())
}

/// Absolute form of a local path, as bind mounts require
fn host_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
