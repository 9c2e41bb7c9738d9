use crate::environment::Environment;
use crate::{InstallOptions, DESCRIPTION_SUFFIX};

pub const RESTART_SEC: u32 = 30;

/// Generate a systemd unit for the command in `options`.
pub fn generate_file(options: &InstallOptions, env: &Environment) -> String {
    let mut unit = String::new();
    unit.push_str("[Unit]\n");
    unit.push_str(&format!(
        "Description={} {}\n",
        options.name, DESCRIPTION_SUFFIX
    ));
    unit.push_str("After=network.target\n");

    unit.push_str("\n[Service]\n");
    unit.push_str(&format!(
        "Environment=PATH={}\n",
        env.service_path_var(&options.path, ':')
    ));
    for entry in &options.env {
        unit.push_str(&format!("Environment={}\n", entry));
    }
    unit.push_str(&format!(
        "WorkingDirectory={}\n",
        env.cwd_or(options.cwd.as_deref())
    ));
    unit.push_str(&format!("ExecStart=/bin/sh -c \"{}\"\n", options.cmd));
    unit.push_str("Restart=always\n");
    unit.push_str(&format!("RestartSec={}\n", RESTART_SEC));
    if options.system {
        if let Some(user) = options.user.as_deref().or(env.user.as_deref()) {
            unit.push_str(&format!("User={}\n", user));
        }
    }

    unit.push_str("\n[Install]\n");
    if options.system {
        unit.push_str("WantedBy=multi-user.target\n");
    } else {
        unit.push_str("WantedBy=default.target\n");
    }
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::environment;
    use std::path::Path;

    fn scenario(system: bool) -> InstallOptions {
        InstallOptions {
            system,
            name: "test-service".into(),
            cmd: "run app.ts".into(),
            home: Some("/home/u".into()),
            user: Some("u".into()),
            ..Default::default()
        }
    }

    #[test]
    fn user_unit() {
        let content = generate_file(&scenario(false), &environment(Path::new("/")));
        assert!(content.contains("Description=test-service (Deno Service)\n"));
        assert!(content.contains("ExecStart=/bin/sh -c \"run app.ts\"\n"));
        assert!(content.contains("WantedBy=default.target\n"));
        assert!(!content.contains("User="));
    }

    #[test]
    fn system_unit() {
        let content = generate_file(&scenario(true), &environment(Path::new("/")));
        assert!(content.contains("WantedBy=multi-user.target\n"));
        assert!(content.contains("User=u\n"));
        assert!(!content.contains("default.target"));
    }

    #[test]
    fn full_unit_layout() {
        let mut options = scenario(false);
        options.path = vec!["/usr/local/bin".into()];
        options.env = vec!["A=1".into(), "A=2".into(), "=odd".into()];
        options.cwd = Some("/work".into());
        let content = generate_file(&options, &environment(Path::new("/")));
        let expected = "\
[Unit]
Description=test-service (Deno Service)
After=network.target

[Service]
Environment=PATH=/usr/local/bin:/opt/deno/bin
Environment=A=1
Environment=A=2
Environment==odd
WorkingDirectory=/work
ExecStart=/bin/sh -c \"run app.ts\"
Restart=always
RestartSec=30

[Install]
WantedBy=default.target
";
        assert_eq!(content, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let env = environment(Path::new("/"));
        let options = scenario(true);
        assert_eq!(generate_file(&options, &env), generate_file(&options, &env));
    }
}
