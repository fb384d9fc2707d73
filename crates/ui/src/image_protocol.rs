//! Terminal graphics capability detection.
//!
//! Deciding whether the terminal can show real pixels (kitty/iTerm2/sixel)
//! requires poking at environment hints and, in the ambiguous cases,
//! querying stdio. The query stalls startup on terminals that never answer,
//! so it is only issued when something in the environment suggests it will
//! succeed; everything else drops straight to halfblocks.

use std::time::Duration;

use ratatui_image::picker::{Capability, Picker, ProtocolType, cap_parser::QueryStdioOptions};

fn kitty_env() -> bool {
    std::env::var("KITTY_WINDOW_ID")
        .ok()
        .is_some_and(|value| !value.trim().is_empty())
}

fn kitty_term() -> bool {
    // `KITTY_WINDOW_ID` is not forwarded over SSH by default, but `TERM` is.
    std::env::var("TERM")
        .ok()
        .is_some_and(|term| term.trim().starts_with("xterm-kitty"))
}

fn iterm_env() -> bool {
    std::env::var("TERM_PROGRAM")
        .ok()
        .is_some_and(|term| term.contains("iTerm"))
        || std::env::var("LC_TERMINAL")
            .ok()
            .is_some_and(|term| term.contains("iTerm"))
}

fn tmux_env() -> bool {
    std::env::var_os("TMUX").is_some()
}

/// How long a stdio capability query may take, or `None` when nothing in
/// the environment suggests querying is worth it.
fn query_timeout() -> Option<Duration> {
    if kitty_env() || kitty_term() || iterm_env() {
        return Some(Duration::from_millis(1_500));
    }
    if tmux_env() {
        // Query quickly; without passthrough the answer never comes.
        return Some(Duration::from_millis(300));
    }
    None
}

/// Kitty graphics inside tmux need passthrough enabled on the server.
/// Ignore failures (old tmux, restricted env, etc).
pub(crate) fn ensure_tmux_allow_passthrough() {
    if !tmux_env() {
        return;
    }
    let _ = std::process::Command::new("tmux")
        .args(["set-option", "-g", "allow-passthrough", "on"])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status();
}

/// Build the best picker this terminal supports.
pub(crate) fn detect_picker() -> Picker {
    let Some(timeout) = query_timeout() else {
        return Picker::halfblocks();
    };
    // Not constructible with literal syntax; the struct has private fields.
    let mut options = QueryStdioOptions::default();
    options.timeout = timeout;
    options.text_sizing_protocol = false;
    let mut picker =
        Picker::from_query_stdio_with_options(options).unwrap_or_else(|_| Picker::halfblocks());
    if !iterm_env()
        && (kitty_env()
            || picker
                .capabilities()
                .iter()
                .any(|cap| matches!(cap, Capability::Kitty)))
    {
        picker.set_protocol_type(ProtocolType::Kitty);
    }
    picker
}

pub(crate) fn protocol_label(picker: &Picker) -> &'static str {
    match picker.protocol_type() {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn with_env_vars(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let _guard = env_lock().lock().unwrap();

        let prev = vars
            .iter()
            .map(|(key, _)| ((*key).to_string(), std::env::var_os(key)))
            .collect::<Vec<(String, Option<OsString>)>>();

        for (key, value) in vars {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }

        f();

        for (key, value) in prev {
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }

    const PLAIN: &[(&str, Option<&str>)] = &[
        ("KITTY_WINDOW_ID", None),
        ("TERM", Some("xterm-256color")),
        ("TMUX", None),
        ("TERM_PROGRAM", None),
        ("LC_TERMINAL", None),
    ];

    #[test]
    fn plain_terminal_skips_the_query() {
        with_env_vars(PLAIN, || assert!(query_timeout().is_none()));
    }

    #[test]
    fn kitty_term_gets_a_generous_timeout() {
        with_env_vars(
            &[
                ("KITTY_WINDOW_ID", None),
                ("TERM", Some("xterm-kitty")),
                ("TMUX", None),
                ("TERM_PROGRAM", None),
                ("LC_TERMINAL", None),
            ],
            || assert_eq!(query_timeout(), Some(Duration::from_millis(1_500))),
        );
    }

    #[test]
    fn tmux_gets_a_short_timeout() {
        with_env_vars(
            &[
                ("KITTY_WINDOW_ID", None),
                ("TERM", Some("xterm-256color")),
                ("TMUX", Some("/tmp/tmux-1000/default,42,0")),
                ("TERM_PROGRAM", None),
                ("LC_TERMINAL", None),
            ],
            || assert_eq!(query_timeout(), Some(Duration::from_millis(300))),
        );
    }

    #[test]
    fn plain_terminal_detects_halfblocks() {
        with_env_vars(PLAIN, || {
            let picker = detect_picker();
            assert_eq!(protocol_label(&picker), "halfblocks");
        });
    }
}
