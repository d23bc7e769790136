//! Built-in policy data: the absolute-deny list, the confirm-required
//! list, and the conditional filter set.
//!
//! Membership tests are exact string equality on the base command token;
//! there is no prefix matching and no alias resolution.

use super::{ConditionalFilter, Predicate};

/// Strictly prohibited commands. A base command on this list is denied
/// unconditionally, before any other tier is consulted.
pub(crate) const DENY_COMMANDS: &[&str] = &[
    // System and file manipulation
    "rm",
    "chmod",
    "chown",
    "chgrp",
    "mkfs",
    "mount",
    "umount",
    "dd",
    // System control and shutdown
    "shutdown",
    "reboot",
    "poweroff",
    "init",
    "systemctl",
    "journalctl",
    // User and access control
    "user",
    "passwd",
    "sudo",
    "su",
    // Process and kernel manipulation
    "kill",
    "dmesg",
    "lsmod",
    "modprobe",
    "insmod",
    "rmmod",
    // Network and firewall
    "iptables",
    "firewalld",
    "ufw",
    "nc",
    // Scheduling and kernel settings
    "crontab",
    "at",
    "swapon",
    "swapoff",
    // Hardware inspection
    "lsusb",
    "lspci",
    "lsblk",
    // Shell history
    "history",
];

/// Commands that execute only after explicit approval.
pub(crate) const CONFIRM_COMMANDS: &[&str] = &[
    // Remote file fetching
    "curl",
    "wget",
    // Package management and installation
    "pip",
    "pip3",
    "npm",
    "yarn",
    "apt-get",
    "apt",
    "yum",
    "dnf",
    "pacman",
    "brew",
    // System-level configuration
    "sysctl",
    "ulimit",
    "update-alternatives",
    "locale-gen",
    // Version managers and environment setup
    "nvm",
    "rbenv",
    "pyenv",
    "sdk",
    "snap",
    // Network and tunneling
    "ssh",
    "scp",
    "ftp",
    "sftp",
    "rsync",
    // Container and VM orchestration
    "docker",
    "docker-compose",
    "podman",
    "kubectl",
    "minikube",
    // System-wide services and daemons
    "service",
    "launchctl",
    // Disk and filesystem tools
    "fdisk",
    "mkfs.ext4",
    "mkfs.ntfs",
    "resize2fs",
    "e2fsck",
    "fsck",
    // Virtual machines
    "qemu",
    "kvm",
    // User session management
    "loginctl",
    "useradd",
    "usermod",
    "groupadd",
    "groupmod",
    // Diagnostics that leak system information
    "netstat",
    "ss",
    "tcpdump",
    "nmap",
    // Overwrite-capable file operations
    "mv",
    "cp",
    "ln",
    // Environment and shell configuration
    "export",
    "source",
    // Process monitoring and file listings
    "top",
    "ps",
    "df",
    "du",
    // Miscellaneous risky commands
    "alias",
    "reset",
    "stty",
];

/// The ordered conditional filter set. Every filter whose base command
/// (and required subcommand, when present) matches is evaluated; matching
/// is never short-circuited after the first hit.
pub(crate) fn builtin_filters() -> Vec<ConditionalFilter> {
    vec![
        ConditionalFilter {
            command: "pip".into(),
            subcommand: Some("install".into()),
            predicate: Predicate::TrustedSourceOrIsolated,
            rationale:
                "Ensure that pip installations are from trusted sources or within a virtual environment."
                    .into(),
        },
        ConditionalFilter {
            command: "npm".into(),
            subcommand: Some("install".into()),
            predicate: Predicate::ScopedToProject,
            rationale:
                "NPM installations are allowed only within the project directory and without global flags."
                    .into(),
        },
        ConditionalFilter {
            command: "docker".into(),
            subcommand: None,
            predicate: Predicate::ContainerRunOrBuild,
            rationale:
                "Docker operations are restricted to running or building images without modifying the host system."
                    .into(),
        },
        ConditionalFilter {
            command: "ssh".into(),
            subcommand: None,
            predicate: Predicate::LastArgTrustedHost,
            rationale: "SSH connections are allowed only to predefined trusted hosts.".into(),
        },
        ConditionalFilter {
            command: "git".into(),
            subcommand: Some("push".into()),
            predicate: Predicate::LastArgAllowedRemote,
            rationale: "Git push operations are restricted to allowed remote repositories.".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_and_confirm_lists_are_disjoint() {
        for name in DENY_COMMANDS {
            assert!(
                !CONFIRM_COMMANDS.contains(name),
                "'{name}' appears in both the deny and confirm lists"
            );
        }
    }

    #[test]
    fn list_entries_are_single_tokens() {
        for name in DENY_COMMANDS.iter().chain(CONFIRM_COMMANDS) {
            assert!(
                !name.contains(char::is_whitespace),
                "'{name}' can never match a single shell-word token"
            );
        }
    }

    #[test]
    fn builtin_filters_cover_expected_commands() {
        let filters = builtin_filters();
        let commands: Vec<&str> = filters.iter().map(|f| f.command.as_str()).collect();
        assert_eq!(commands, vec!["pip", "npm", "docker", "ssh", "git"]);
    }

    #[test]
    fn filter_base_commands_are_never_deny_listed() {
        for filter in builtin_filters() {
            assert!(
                !DENY_COMMANDS.contains(&filter.command.as_str()),
                "filter on '{}' is unreachable behind the deny list",
                filter.command
            );
        }
    }
}
