use std::fmt;
use std::str::FromStr;

/// Platform the external test process runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPlatform {
    /// A local executable started directly
    Desktop,
    /// An Android activity started over adb
    Android,
    /// An iOS app started through the device run script
    Ios,
}

/// Placeholders: `{app}`, `{host}`, `{port}`
struct LaunchTemplate {
    program: &'static str,
    args: &'static [&'static str],
}

const LAUNCH_TABLE: &[(TargetPlatform, LaunchTemplate)] = &[
    (
        TargetPlatform::Desktop,
        LaunchTemplate {
            program: "{app}",
            args: &["{host}", "{port}"],
        },
    ),
    (
        TargetPlatform::Android,
        LaunchTemplate {
            program: "adb",
            args: &[
                "shell", "am", "start", "-n", "{app}", "-e", "host", "{host}", "-e", "port",
                "{port}",
            ],
        },
    ),
    (
        TargetPlatform::Ios,
        LaunchTemplate {
            program: "./runOnDevice.sh",
            args: &["{app}", "{host}", "{port}"],
        },
    ),
];

/// A fully substituted command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl TargetPlatform {
    pub const ALL: [TargetPlatform; 3] = [
        TargetPlatform::Desktop,
        TargetPlatform::Android,
        TargetPlatform::Ios,
    ];

    /// Build the command that starts `app` and points it at `host:port`
    pub fn launch_command(self, app: &str, host: &str, port: u16) -> LaunchCommand {
        let port = port.to_string();
        let substitute = |part: &str| {
            part.replace("{app}", app)
                .replace("{host}", host)
                .replace("{port}", &port)
        };

        // Every variant has a row
        let template = LAUNCH_TABLE
            .iter()
            .find(|(platform, _)| *platform == self)
            .map(|(_, template)| template)
            .unwrap_or(&LAUNCH_TABLE[0].1);

        LaunchCommand {
            program: substitute(template.program),
            args: template.args.iter().map(|arg| substitute(*arg)).collect(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetPlatform::Desktop => "desktop",
            TargetPlatform::Android => "android",
            TargetPlatform::Ios => "ios",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPlatform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown platform `{}` (expected one of: desktop, android, ios)",
                    s
                )
            })
    }
}
