use crate::environment::Environment;
use crate::{InstallOptions, DESCRIPTION_SUFFIX};

/// Generate an upstart job definition.
pub fn generate_file(options: &InstallOptions, env: &Environment) -> String {
    let mut job = String::new();
    job.push_str(&format!(
        "description \"{} {}\"\n\n",
        options.name, DESCRIPTION_SUFFIX
    ));
    job.push_str("start on runlevel [2345]\n");
    job.push_str("stop on runlevel [!2345]\n\n");
    job.push_str("respawn\n");
    job.push_str("respawn limit 10 5\n\n");

    job.push_str(&format!(
        "env PATH={}\n",
        env.service_path_var(&options.path, ':')
    ));
    for entry in &options.env {
        job.push_str(&format!("env {}\n", entry));
    }
    job.push('\n');

    if let Some(user) = &options.user {
        job.push_str(&format!("setuid {}\n", user));
    }
    job.push_str(&format!("chdir {}\n", env.cwd_or(options.cwd.as_deref())));
    job.push_str(&format!("exec {}\n", options.cmd));
    job
}
