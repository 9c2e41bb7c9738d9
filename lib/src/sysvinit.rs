use crate::environment::Environment;
use crate::{InstallOptions, DESCRIPTION_SUFFIX};

pub fn pid_file(name: &str) -> String {
    format!("/var/run/{}.pid", name)
}

/// Generate a POSIX init script with `start|stop|restart|status` verbs.
pub fn generate_file(options: &InstallOptions, env: &Environment) -> String {
    let name = &options.name;
    let pid = pid_file(name);

    let mut script = String::new();
    script.push_str("#!/bin/sh\n");
    script.push_str("### BEGIN INIT INFO\n");
    script.push_str(&format!("# Provides:          {}\n", name));
    script.push_str("# Required-Start:    $remote_fs $syslog\n");
    script.push_str("# Required-Stop:     $remote_fs $syslog\n");
    script.push_str("# Default-Start:     2 3 4 5\n");
    script.push_str("# Default-Stop:      0 1 6\n");
    script.push_str(&format!(
        "# Short-Description: {} {}\n",
        name, DESCRIPTION_SUFFIX
    ));
    script.push_str("### END INIT INFO\n\n");

    script.push_str("case \"$1\" in\n");

    script.push_str("  start)\n");
    script.push_str(&format!("    echo \"Starting {}\"\n", name));
    script.push_str(&format!(
        "    cd \"{}\"\n",
        env.cwd_or(options.cwd.as_deref())
    ));
    script.push_str(&format!(
        "    env PATH=\"{}\" \\\n",
        env.service_path_var(&options.path, ':')
    ));
    for entry in &options.env {
        script.push_str(&format!("      {} \\\n", entry));
    }
    script.push_str(&format!("      {} > /dev/null 2>&1 &\n", options.cmd));
    script.push_str(&format!("    echo $! > {}\n", pid));
    script.push_str("    ;;\n");

    script.push_str("  stop)\n");
    script.push_str(&format!("    echo \"Stopping {}\"\n", name));
    script.push_str(&format!("    PID=$(cat {})\n", pid));
    script.push_str("    kill $PID\n");
    script.push_str(&format!("    rm -f {}\n", pid));
    script.push_str("    ;;\n");

    script.push_str("  restart)\n");
    script.push_str("    $0 stop\n");
    script.push_str("    $0 start\n");
    script.push_str("    ;;\n");

    script.push_str("  status)\n");
    script.push_str(&format!("    if [ -e {} ]; then\n", pid));
    script.push_str(&format!(
        "      echo \"{} is running, pid=$(cat {})\"\n",
        name, pid
    ));
    script.push_str("    else\n");
    script.push_str(&format!("      echo \"{} is not running\"\n", name));
    script.push_str("      exit 1\n");
    script.push_str("    fi\n");
    script.push_str("    ;;\n");

    script.push_str("  *)\n");
    script.push_str("    echo \"Usage: $0 {start|stop|restart|status}\"\n");
    script.push_str("    exit 1\n");
    script.push_str("    ;;\n");
    script.push_str("esac\n\n");
    script.push_str("exit 0\n");
    script
}
