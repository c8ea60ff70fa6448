//! Controls of the window manager itself
use tracing::debug;

use crate::{atoms::names, command::Command, model::WindowId, remote::Remote, SubtlextError, SubtlextResult};

/// Version string subtle publishes on its check window, `None` if subtle isn't running
pub fn version(remote: &dyn Remote) -> SubtlextResult<Option<String>> {
    let check = match remote.root_windows(names::_NET_SUPPORTING_WM_CHECK)?.and_then(|x| x.first().copied()) {
        Some(win) => win,
        None => return Ok(None),
    };
    let version = remote.string(check, names::SUBTLE_VERSION)?;
    debug!("version: check: {:#x}, version: {:?}", check, version);
    Ok(version)
}

/// Check if subtle is managing the display
pub fn is_running(remote: &dyn Remote) -> SubtlextResult<bool> {
    Ok(version(remote)?.is_some())
}

/// Fail with `NotRunning` unless subtle is managing the display
pub fn ensure_running(remote: &dyn Remote) -> SubtlextResult<()> {
    match is_running(remote)? {
        true => Ok(()),
        false => Err(SubtlextError::NotRunning.into()),
    }
}

/// Reload the config of subtle
pub fn reload(remote: &dyn Remote) -> SubtlextResult<()> {
    remote.send(&Command::reload())
}

pub fn restart(remote: &dyn Remote) -> SubtlextResult<()> {
    remote.send(&Command::restart())
}

pub fn quit(remote: &dyn Remote) -> SubtlextResult<()> {
    remote.send(&Command::quit())
}

/// Redraw the panels
pub fn render(remote: &dyn Remote) -> SubtlextResult<()> {
    remote.send(&Command::render())
}

/// Let the user pick a window with the pointer
pub fn select_window(remote: &dyn Remote) -> SubtlextResult<WindowId> {
    Ok(remote.select_window()?.ok_or(SubtlextError::InteractiveSelectionFailed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;

    #[test]
    fn test_running() {
        let remote = MockRemote::new()
            .with_windows(ROOT, "_NET_SUPPORTING_WM_CHECK", &[5])
            .with_strings(5, "SUBTLE_VERSION", &["0.12.6606"]);
        assert_eq!(version(&remote).unwrap().as_deref(), Some("0.12.6606"));
        assert!(is_running(&remote).unwrap());
        assert!(ensure_running(&remote).is_ok());
    }

    #[test]
    fn test_other_window_manager() {
        let remote = MockRemote::new().with_windows(ROOT, "_NET_SUPPORTING_WM_CHECK", &[5]);
        assert!(!is_running(&remote).unwrap());
        let err = ensure_running(&remote).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::NotRunning));
        assert!(!is_running(&MockRemote::new()).unwrap());
    }

    #[test]
    fn test_commands() {
        let remote = MockRemote::new();
        reload(&remote).unwrap();
        restart(&remote).unwrap();
        quit(&remote).unwrap();
        render(&remote).unwrap();
        assert_eq!(remote.sent(), vec![Command::reload(), Command::restart(), Command::quit(), Command::render()]);
    }

    #[test]
    fn test_select_window() {
        assert_eq!(select_window(&MockRemote::new().with_selection(7)).unwrap(), 7);
        let err = select_window(&MockRemote::new()).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::InteractiveSelectionFailed));
    }
}
