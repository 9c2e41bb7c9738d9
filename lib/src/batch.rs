use crate::environment::Environment;
use crate::{InstallOptions, DESCRIPTION_SUFFIX};

const EOL: &str = "\r\n";

/// Generate the batch wrapper registered with the Service Control Manager.
///
/// The wrapper prepares PATH and the environment, then hands the command to
/// the runtime-hosted bridge which talks to the SCM on its behalf.
pub fn generate_file(options: &InstallOptions, env: &Environment) -> String {
    let mut lines = vec![
        String::from("@echo off"),
        format!("rem {} {}", options.name, DESCRIPTION_SUFFIX),
        format!("set \"PATH={}\"", env.service_path_var(&options.path, ';')),
    ];
    for entry in &options.env {
        lines.push(format!("set \"{}\"", entry));
    }
    lines.push(format!("cd /d \"{}\"", env.cwd_or(options.cwd.as_deref())));
    lines.push(format!(
        "\"{}\" {} --serviceName \"{}\" -- {}",
        env.runtime.display(),
        env.windows_bridge,
        options.name,
        options.cmd
    ));

    let mut script = lines.join(EOL);
    script.push_str(EOL);
    script
}
