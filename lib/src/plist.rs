use crate::environment::Environment;
use crate::error::{Result, ServiceError};
use crate::InstallOptions;
use plist::stream::{Event, Writer, XmlWriter};
use plist::XmlWriteOptions;

/// Generate a launchd property list.
///
/// The command line is split on whitespace into `ProgramArguments`; quoted
/// arguments containing spaces are not kept together. The document is written
/// as an event stream so `EnvironmentVariables` can repeat a key: every `env`
/// entry becomes its own `<key>`/`<string>` pair, after `PATH`.
pub fn generate_file(options: &InstallOptions, env: &Environment) -> Result<String> {
    let mut plist_data = Vec::new();
    let mut writer = XmlWriter::new_with_options(&mut plist_data, &XmlWriteOptions::default());

    write_plist(&mut writer, options, env)
        .map_err(|e| ServiceError::Render(format!("Failed to serialize plist: {e}")))?;
    drop(writer);
    String::from_utf8(plist_data).map_err(|e| ServiceError::Render(e.to_string()))
}

fn write_plist<W: Writer>(
    w: &mut W,
    options: &InstallOptions,
    env: &Environment,
) -> std::result::Result<(), plist::Error> {
    w.write(Event::StartDictionary(None))?;

    string_entry(w, "Label", &options.name)?;

    key(w, "ProgramArguments")?;
    w.write(Event::StartArray(None))?;
    for arg in options.cmd.split_whitespace() {
        w.write(Event::String(arg.into()))?;
    }
    w.write(Event::EndCollection)?;

    string_entry(w, "WorkingDirectory", &env.cwd_or(options.cwd.as_deref()))?;
    key(w, "RunAtLoad")?;
    w.write(Event::Boolean(true))?;
    key(w, "KeepAlive")?;
    w.write(Event::Boolean(true))?;

    if options.system {
        if let Some(user) = &options.user {
            string_entry(w, "UserName", user)?;
        }
    }

    key(w, "EnvironmentVariables")?;
    w.write(Event::StartDictionary(None))?;
    string_entry(w, "PATH", &env.service_path_var(&options.path, ':'))?;
    for entry in &options.env {
        let (name, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
        string_entry(w, name, value)?;
    }
    w.write(Event::EndCollection)?;

    w.write(Event::EndCollection)
}

fn key<W: Writer>(w: &mut W, name: &str) -> std::result::Result<(), plist::Error> {
    w.write(Event::String(name.into()))
}

fn string_entry<W: Writer>(
    w: &mut W,
    name: &str,
    value: &str,
) -> std::result::Result<(), plist::Error> {
    key(w, name)?;
    w.write(Event::String(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{environment, options};
    use plist::Value;
    use std::path::Path;

    fn parse(content: &str) -> plist::Dictionary {
        Value::from_reader_xml(content.as_bytes())
            .unwrap()
            .into_dictionary()
            .unwrap()
    }

    #[test]
    fn command_is_split_on_whitespace() {
        let content = generate_file(
            &options("com.example.app", "deno run  \"my file.ts\""),
            &environment(Path::new("/")),
        )
        .unwrap();
        assert!(content.starts_with("<?xml"));
        assert!(content.trim_end().ends_with("</plist>"));
        let dict = parse(&content);
        let args: Vec<&str> = dict.get("ProgramArguments").unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_string().unwrap())
            .collect();
        assert_eq!(args, ["deno", "run", "\"my", "file.ts\""]);
        assert_eq!(dict.get("Label").unwrap().as_string(), Some("com.example.app"));
        assert_eq!(dict.get("WorkingDirectory").unwrap().as_string(), Some("/srv/app"));
        assert_eq!(dict.get("KeepAlive").unwrap().as_boolean(), Some(true));
        assert_eq!(dict.get("RunAtLoad").unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn repeated_environment_keys_are_all_written() {
        let mut opts = options("app", "app");
        opts.env = vec!["A=1".into(), "ALPHA=x=y".into(), "A=2".into(), "PATH=/x".into()];
        let content = generate_file(&opts, &environment(Path::new("/"))).unwrap();

        assert_eq!(content.matches("<key>A</key>").count(), 2);
        assert_eq!(content.matches("<key>PATH</key>").count(), 2);
        let positions: Vec<usize> = [
            "<string>/opt/deno/bin</string>",
            "<string>1</string>",
            "<string>x=y</string>",
            "<string>2</string>",
            "<string>/x</string>",
        ]
        .iter()
        .map(|needle| content.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn user_name_only_in_system_mode() {
        let mut opts = options("app", "app");
        opts.user = Some("daemon".into());
        let env = environment(Path::new("/"));
        assert!(!generate_file(&opts, &env).unwrap().contains("UserName"));
        opts.system = true;
        let dict = parse(&generate_file(&opts, &env).unwrap());
        assert_eq!(dict.get("UserName").unwrap().as_string(), Some("daemon"));
    }
}
