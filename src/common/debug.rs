use std::process::Command;
use tracing::info;

/// Log the desktop session details that decide which hotkey and tray backends work
pub fn log_session_info() {
    info!("=== Session Information ===");

    if let Ok(kernel) = get_command_output("uname", &["-sr"]) {
        info!("Kernel: {}", kernel);
    }

    if let Ok(os_release) = std::fs::read_to_string("/etc/os-release")
        && let Some(name) = pretty_name(&os_release)
    {
        info!("OS: {}", name);
    }

    match std::env::var("XDG_SESSION_TYPE") {
        Ok(session) => info!("Session Type: {}", session),
        Err(_) => info!("Session Type: unknown"),
    }
    if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
        info!("Desktop Environment: {}", desktop);
    }

    // Global hotkeys need an X server (native or XWayland)
    info!("X11 Display: {}", display_status(std::env::var("DISPLAY").ok().as_deref()));
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        info!("Wayland session detected: hotkey only fires while an XWayland window has focus");
    }

    info!("===========================");
}

/// `PRETTY_NAME` from an os-release file
fn pretty_name(os_release: &str) -> Option<&str> {
    os_release
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|name| name.trim_matches('"'))
}

fn display_status(value: Option<&str>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "not set, hotkey will be unavailable".to_string(),
    }
}

fn get_command_output(cmd: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new(cmd).args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_name() {
        let os_release = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(pretty_name(os_release), Some("Arch Linux"));
        assert_eq!(pretty_name("ID=debian\n"), None);
    }

    #[test]
    fn test_display_status() {
        assert_eq!(display_status(Some(":0")), ":0");
        assert_eq!(display_status(None), "not set, hotkey will be unavailable");
    }
}
