use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::entities::{LaunchCommand, TargetPlatform};
use crate::error::HarnessError;
use crate::use_cases::ports::Launcher;

/// Starts the test process with the platform's launch command
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    platform: TargetPlatform,
    app: String,
    advertised_host: Option<String>,
}

impl CommandLauncher {
    pub fn new(platform: TargetPlatform, app: impl Into<String>) -> Self {
        Self {
            platform,
            app: app.into(),
            advertised_host: None,
        }
    }

    /// Host passed to the test process instead of the bound address.
    ///
    /// Needed when the collector listens on a wildcard address, which a
    /// remote device cannot connect to.
    pub fn with_advertised_host(mut self, host: impl Into<String>) -> Self {
        self.advertised_host = Some(host.into());
        self
    }

    /// Build the launch command pointing the test process at `addr`.
    ///
    /// A wildcard bind address is not dialable, so it is replaced: with
    /// loopback for a desktop process on this machine, otherwise with this
    /// machine's own resolved address.
    pub async fn command(&self, addr: SocketAddr) -> Result<LaunchCommand, HarnessError> {
        let host = match &self.advertised_host {
            Some(host) => host.clone(),
            None if addr.ip().is_unspecified() => match self.platform {
                TargetPlatform::Desktop if addr.is_ipv4() => Ipv4Addr::LOCALHOST.to_string(),
                TargetPlatform::Desktop => Ipv6Addr::LOCALHOST.to_string(),
                TargetPlatform::Android | TargetPlatform::Ios => {
                    local_machine_address(addr).await?.to_string()
                }
            },
            None => addr.ip().to_string(),
        };
        Ok(self.platform.launch_command(&self.app, &host, addr.port()))
    }
}

/// Address other hosts can reach this machine on, found by resolving its hostname.
///
/// Prefers a non-loopback address of the same family as `bound`.
pub(crate) async fn local_machine_address(bound: SocketAddr) -> Result<IpAddr, HarnessError> {
    let name = gethostname::gethostname()
        .into_string()
        .map_err(|_| HarnessError::ResolveError("local hostname is not valid UTF-8".to_string()))?;

    let candidates: Vec<IpAddr> = tokio::net::lookup_host((name.as_str(), bound.port()))
        .await
        .map_err(|e| HarnessError::ResolveError(format!("{}: {}", name, e)))?
        .map(|resolved| resolved.ip())
        .collect();

    let ip = pick_routable(&candidates, bound.is_ipv4())
        .ok_or_else(|| HarnessError::ResolveError(format!("{} has no addresses", name)))?;
    if ip.is_loopback() {
        warn!(hostname = %name, %ip, "Hostname only resolves to loopback; pass an advertised host for remote devices");
    }
    Ok(ip)
}

fn pick_routable(candidates: &[IpAddr], ipv4: bool) -> Option<IpAddr> {
    candidates
        .iter()
        .find(|ip| ip.is_ipv4() == ipv4 && !ip.is_loopback())
        .or_else(|| candidates.iter().find(|ip| !ip.is_loopback()))
        .or_else(|| candidates.first())
        .copied()
}

#[async_trait]
impl Launcher for CommandLauncher {
    async fn launch(&self, addr: SocketAddr) -> Result<(), HarnessError> {
        let command = self.command(addr).await?;
        info!(platform = %self.platform, %command, "Launching test process");

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| HarnessError::LaunchError {
                program: command.program.clone(),
                source,
            })?;

        info!(pid = ?child.id(), "Test process started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_uses_bound_addr() {
        let launcher = CommandLauncher::new(TargetPlatform::Desktop, "./UnitTests");
        let command = launcher.command("192.168.1.5:50007".parse().unwrap()).await.unwrap();
        assert_eq!(command.args, vec!["192.168.1.5", "50007"]);
    }

    #[tokio::test]
    async fn test_desktop_wildcard_uses_loopback() {
        let launcher = CommandLauncher::new(TargetPlatform::Desktop, "./UnitTests");
        let command = launcher.command("0.0.0.0:50007".parse().unwrap()).await.unwrap();
        assert_eq!(command.args, vec!["127.0.0.1", "50007"]);
    }

    #[tokio::test]
    async fn test_device_wildcard_uses_machine_address() {
        let addr: SocketAddr = "0.0.0.0:50007".parse().unwrap();
        let launcher = CommandLauncher::new(TargetPlatform::Android, "com.example/.Main");

        match local_machine_address(addr).await {
            Ok(ip) => {
                let command = launcher.command(addr).await.unwrap();
                let host_index = command.args.iter().position(|arg| arg == "host").unwrap() + 1;
                assert_eq!(command.args[host_index], ip.to_string());
                assert_ne!(command.args[host_index], "0.0.0.0");
            }
            Err(_) => {
                let result = launcher.command(addr).await;
                assert!(matches!(result, Err(HarnessError::ResolveError(_))));
            }
        }
    }

    #[tokio::test]
    async fn test_command_prefers_advertised_host() {
        let launcher = CommandLauncher::new(TargetPlatform::Ios, "UnitTests")
            .with_advertised_host("10.0.0.7");
        let command = launcher.command("0.0.0.0:50007".parse().unwrap()).await.unwrap();
        assert_eq!(command.args, vec!["UnitTests", "10.0.0.7", "50007"]);
    }

    #[test]
    fn test_pick_routable_skips_loopback() {
        let candidates: Vec<IpAddr> = vec![
            "127.0.1.1".parse().unwrap(),
            "fe80::1".parse().unwrap(),
            "192.168.1.5".parse().unwrap(),
        ];
        assert_eq!(pick_routable(&candidates, true), Some("192.168.1.5".parse().unwrap()));
        assert_eq!(pick_routable(&candidates, false), Some("fe80::1".parse().unwrap()));
    }

    #[test]
    fn test_pick_routable_falls_back() {
        let only_v6: Vec<IpAddr> = vec!["::1".parse().unwrap(), "2001:db8::5".parse().unwrap()];
        assert_eq!(pick_routable(&only_v6, true), Some("2001:db8::5".parse().unwrap()));

        let only_loopback: Vec<IpAddr> = vec!["127.0.0.1".parse().unwrap()];
        assert_eq!(pick_routable(&only_loopback, true), Some("127.0.0.1".parse().unwrap()));

        assert_eq!(pick_routable(&[], true), None);
    }

    #[tokio::test]
    async fn test_launch_missing_program_fails() {
        let launcher = CommandLauncher::new(
            TargetPlatform::Desktop,
            "./definitely-not-a-real-test-binary",
        );
        let result = launcher.launch("127.0.0.1:50007".parse().unwrap()).await;
        assert!(matches!(result, Err(HarnessError::LaunchError { .. })));
    }
}
