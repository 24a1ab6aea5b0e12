//! Artifact upload
//!
//! Sends the local artifact into the target's base directory under the
//! generated build name.

use std::path::Path;

use tracing::info;

use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteShell};
use crate::domain::value_objects::{BuildName, BuildTarget};
use crate::error::DeployResult;

/// Upload `artifact` as `<base>/<build>.jar` and return the remote path.
///
/// The destination directory is expected to exist already.
pub fn upload_artifact<S>(
    shell: &S,
    artifact: &Path,
    target: BuildTarget,
    build: &BuildName,
    events: &dyn DeployEventSink,
) -> DeployResult<String>
where
    S: RemoteShell + ?Sized,
{
    let remote = target.path(&build.artifact_file());
    info!(artifact = %artifact.display(), %remote, "uploading artifact");

    events.on_event(DeployEvent::UploadStarted {
        local: artifact.to_path_buf(),
        remote: format!("~/{}", remote),
    });

    let wants_progress = events.wants_progress();
    shell.upload(artifact, &remote, &mut |progress| {
        if wants_progress {
            events.on_event(DeployEvent::UploadProgress(progress.clone()));
        }
    })?;

    events.on_event(DeployEvent::UploadFinished);
    Ok(remote)
}
