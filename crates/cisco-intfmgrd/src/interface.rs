//! Interface session driver.
//!
//! An [`Interface`] reconciles one IOS interface: it enters global then
//! interface configuration mode, sends the rendered command for every change
//! in rank order and leaves both modes again. The mode bracket is always
//! sent, even when nothing changed, so the device is left at the exec
//! prompt whatever happened to individual properties.

use netdev_cfgmgr_common::{CfgMgrError, CfgMgrResult, CommandChannel, ErrorSink, ResponseScan};
use tracing::{debug, info, instrument, warn};

use crate::diff::{diff, Change};
use crate::property::{Property, PropertySet, PropertyValue};
use crate::render::{render_prefixed, Rendering, NEGATION_PREFIX};

/// Enters global configuration mode.
pub const CONFIGURE_TERMINAL_CMD: &str = "conf t";

/// Leaves the current configuration mode.
pub const EXIT_CMD: &str = "exit";

/// Configuration mode of the device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Exec mode, outside any configuration mode.
    Idle,
    /// After `conf t`.
    GlobalConfig,
    /// After `interface <name>`.
    InterfaceConfig,
}

/// Outcome of one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    pub change: Change,
    pub applied: bool,
}

/// Result of an [`Interface::update`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub outcomes: Vec<ChangeOutcome>,
}

impl UpdateReport {
    /// Properties the device accepted.
    pub fn applied(&self) -> Vec<Property> {
        self.outcomes
            .iter()
            .filter(|o| o.applied)
            .map(|o| o.change.property)
            .collect()
    }

    /// Properties that could not be applied.
    pub fn failed(&self) -> Vec<Property> {
        self.outcomes
            .iter()
            .filter(|o| !o.applied)
            .map(|o| o.change.property)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.applied)
    }
}

/// One interface of a device, bound to a borrowed command channel.
pub struct Interface<'a> {
    name: String,
    channel: &'a mut dyn CommandChannel,
    sink: &'a dyn ErrorSink,
    state: SessionState,
}

impl<'a> Interface<'a> {
    /// Creates a new interface session.
    ///
    /// # Arguments
    ///
    /// * `name` - Interface name as IOS spells it (e.g. "FastEthernet0/1")
    /// * `channel` - Transport to the device, owned by the caller
    /// * `sink` - Receives a report for every command the device rejects
    pub fn new(
        name: impl Into<String>,
        channel: &'a mut dyn CommandChannel,
        sink: &'a dyn ErrorSink,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            sink,
            state: SessionState::Idle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Reconciles the interface from `current` to `desired`.
    ///
    /// Every change is attempted even if earlier ones fail; the returned
    /// report says which were applied. Transport errors abort the session
    /// and are returned unchanged.
    #[instrument(skip_all, fields(interface = %self.name))]
    pub async fn update(
        &mut self,
        current: &PropertySet,
        desired: &PropertySet,
    ) -> CfgMgrResult<UpdateReport> {
        let changes = diff(current, desired);
        debug!("Updating interface {} ({} changes)", self.name, changes.len());

        // A transport error leaves the recorded mode stale. `conf t` is
        // accepted from any configuration mode, so restart the bracket.
        if self.state != SessionState::Idle {
            warn!(
                "Previous session on {} stopped in {:?}, restarting from exec mode",
                self.name, self.state
            );
            self.state = SessionState::Idle;
        }

        self.command(CONFIGURE_TERMINAL_CMD).await?;
        self.transition(SessionState::Idle, SessionState::GlobalConfig)?;

        let enter_interface = format!("interface {}", self.name);
        self.command(&enter_interface).await?;
        self.transition(SessionState::GlobalConfig, SessionState::InterfaceConfig)?;

        let mut report = UpdateReport::default();
        for change in changes {
            let prefix = change.removed.then_some(NEGATION_PREFIX);
            let applied = match self.execute(change.property, &change.value, prefix).await {
                Ok(applied) => applied,
                Err(e @ CfgMgrError::Transport { .. }) => return Err(e),
                Err(e) => {
                    self.sink.report(&format!(
                        "Error while executing {} on {}: {}",
                        change.property, self.name, e
                    ));
                    false
                }
            };
            report.outcomes.push(ChangeOutcome { change, applied });
        }

        self.command(EXIT_CMD).await?;
        self.transition(SessionState::InterfaceConfig, SessionState::GlobalConfig)?;
        self.command(EXIT_CMD).await?;
        self.transition(SessionState::GlobalConfig, SessionState::Idle)?;

        info!(
            applied = report.applied().len(),
            failed = report.failed().len(),
            "Updated interface {}",
            self.name
        );
        Ok(report)
    }

    /// Sends the commands for one property.
    ///
    /// `prefix` is prepended verbatim to the rendered commands; pass
    /// `Some("no ")` to remove the setting.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The device accepted the property
    /// * `Ok(false)` - The device rejected it (already reported)
    /// * `Err(_)` - Render or transport failure
    pub async fn execute(
        &mut self,
        property: Property,
        value: &PropertyValue,
        prefix: Option<&str>,
    ) -> CfgMgrResult<bool> {
        let rendering = render_prefixed(property, value, prefix.unwrap_or(""))?;

        match rendering {
            Rendering::Single(cmd) => self.command(&cmd).await,
            Rendering::FirstOf(candidates) => {
                let mut accepted = false;
                for (i, cmd) in candidates.iter().enumerate() {
                    accepted = self.command(cmd).await?;
                    if accepted {
                        break;
                    }
                    if let Some(next) = candidates.get(i + 1) {
                        warn!("'{}' rejected, falling back to '{}'", cmd, next);
                    }
                }
                Ok(accepted)
            }
            Rendering::Each(cmds) => {
                let mut all_accepted = true;
                for cmd in &cmds {
                    all_accepted &= self.command(cmd).await?;
                }
                Ok(all_accepted)
            }
        }
    }

    /// Sends one command and scans the response for the rejection marker.
    ///
    /// Returns `Ok(false)` and reports to the error sink if any response
    /// line starts with `"% "`.
    pub async fn command(&mut self, text: &str) -> CfgMgrResult<bool> {
        debug!(command = %text, state = ?self.state, "Sending command");

        let mut scan = ResponseScan::new();
        self.channel
            .command(text, &mut |line| scan.observe(line))
            .await?;

        debug!(command = %text, lines = scan.lines_seen(), accepted = scan.accepted(), "Response");
        match scan.rejection() {
            Some(line) => {
                self.sink.report(&format!(
                    "Error while executing '{}', device returned '{}'",
                    text, line
                ));
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> CfgMgrResult<()> {
        if self.state != from {
            return Err(CfgMgrError::internal(format!(
                "session for {} is {:?}, expected {:?}",
                self.name, self.state, from
            )));
        }
        debug!("{:?} -> {:?}", from, to);
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::AddressEntry;
    use crate::property_set;
    use netdev_cfgmgr_test::{CollectingErrorSink, ScriptedChannel};
    use pretty_assertions::assert_eq;

    const NAME: &str = "FastEthernet0/1";

    fn cmds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_update_sends_bracket_only() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let report = intf
            .update(&PropertySet::new(), &PropertySet::new())
            .await
            .unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(intf.state(), SessionState::Idle);
        assert_eq!(
            channel.sent(),
            cmds(&["conf t", "interface FastEthernet0/1", "exit", "exit"])
        );
    }

    #[tokio::test]
    async fn test_update_only_differing_properties() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let current = property_set! {
            Property::Description => "a",
            Property::Mode => "access",
        };
        let desired = property_set! {
            Property::Description => "b",
            Property::Mode => "access",
        };
        let report = intf.update(&current, &desired).await.unwrap();

        assert_eq!(report.applied(), vec![Property::Description]);
        assert_eq!(
            channel.sent(),
            cmds(&[
                "conf t",
                "interface FastEthernet0/1",
                "description b",
                "exit",
                "exit"
            ])
        );
    }

    #[tokio::test]
    async fn test_update_removal_uses_no_prefix() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let current = property_set! { Property::Description => "a" };
        intf.update(&current, &PropertySet::new()).await.unwrap();

        assert_eq!(channel.property_commands(), cmds(&["no description a"]));
    }

    #[tokio::test]
    async fn test_execute_plain_and_prefixed() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        assert!(intf.execute(Property::Speed, &"auto".into(), None).await.unwrap());
        assert!(intf
            .execute(Property::Speed, &"auto".into(), Some("no "))
            .await
            .unwrap());

        assert_eq!(channel.sent(), cmds(&["speed auto", "no speed auto"]));
    }

    #[tokio::test]
    async fn test_execute_stops_at_first_accepted_alternative() {
        let mut channel = ScriptedChannel::new().reply("channel-group 1", &["% Invalid command"]);
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let applied = intf
            .execute(Property::Etherchannel, &"1".into(), None)
            .await
            .unwrap();

        assert!(applied);
        assert_eq!(channel.sent(), cmds(&["channel-group 1", "port group 1"]));
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_execute_first_alternative_accepted() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        intf.execute(Property::Etherchannel, &"3".into(), None)
            .await
            .unwrap();

        assert_eq!(channel.sent(), cmds(&["channel-group 3"]));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_execute_all_alternatives_rejected() {
        let mut channel = ScriptedChannel::new()
            .reply("channel-group 1", &["% Invalid command"])
            .reply("port group 1", &["% Invalid input detected"]);
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let applied = intf
            .execute(Property::Etherchannel, &"1".into(), None)
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(sink.count(), 2);
        assert!(sink.reports()[1].contains("port group 1"));
    }

    #[tokio::test]
    async fn test_execute_addresses() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let value = PropertyValue::Addresses(vec![
            AddressEntry::new(24, "192.168.0.1".parse().unwrap()),
            AddressEntry::new(76, "fe08::".parse().unwrap()).with_qualifier("link-local"),
        ]);
        assert!(intf.execute(Property::Ipaddress, &value, None).await.unwrap());

        assert_eq!(
            channel.sent(),
            cmds(&[
                "ip address 192.168.0.1 255.255.255.0",
                "ipv6 address fe08::/76 link-local"
            ])
        );
    }

    #[tokio::test]
    async fn test_execute_addresses_partial_rejection() {
        let mut channel = ScriptedChannel::new().reply(
            "ip address 10.0.0.1 255.255.255.0",
            &["% 10.0.0.0 overlaps with Vlan1"],
        );
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let value = PropertyValue::Addresses(vec![
            AddressEntry::new(24, "10.0.0.1".parse().unwrap()),
            AddressEntry::new(64, "2001:db8::1".parse().unwrap()),
        ]);
        let applied = intf.execute(Property::Ipaddress, &value, None).await.unwrap();

        assert!(!applied);
        // the second address is still sent
        assert_eq!(channel.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_command_detects_rejection() {
        let mut channel = ScriptedChannel::new().reply("sh ver", &["ok", "% Invalid Command"]);
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        assert!(!intf.command("sh ver").await.unwrap());
        assert_eq!(sink.count(), 1);
        assert!(sink.reports()[0].contains("sh ver"));
        assert!(sink.reports()[0].contains("% Invalid Command"));
    }

    #[tokio::test]
    async fn test_command_success() {
        let mut channel = ScriptedChannel::new().reply("sh ver", &["ok", "done"]);
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        assert!(intf.command("sh ver").await.unwrap());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_property_does_not_stop_update() {
        let mut channel = ScriptedChannel::new().reply("speed 1000", &["% Invalid input"]);
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let desired = property_set! {
            Property::Speed => "1000",
            Property::Duplex => "full",
        };
        let report = intf.update(&PropertySet::new(), &desired).await.unwrap();

        assert_eq!(report.failed(), vec![Property::Speed]);
        assert_eq!(report.applied(), vec![Property::Duplex]);
        assert!(!report.is_success());
        assert_eq!(
            channel.sent(),
            cmds(&[
                "conf t",
                "interface FastEthernet0/1",
                "speed 1000",
                "duplex full",
                "exit",
                "exit"
            ])
        );
    }

    #[tokio::test]
    async fn test_render_error_reported_and_skipped() {
        let mut channel = ScriptedChannel::new();
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let desired = property_set! {
            Property::Description => "x",
            Property::Ipaddress => "10.0.0.1",
        };
        let report = intf.update(&PropertySet::new(), &desired).await.unwrap();

        assert_eq!(report.failed(), vec![Property::Ipaddress]);
        assert_eq!(sink.count(), 1);
        assert!(sink.reports()[0].contains("ipaddress"));
        assert_eq!(channel.property_commands(), cmds(&["description x"]));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut channel =
            ScriptedChannel::new().fail_on("interface FastEthernet0/1", "connection reset");
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let result = intf.update(&PropertySet::new(), &PropertySet::new()).await;

        assert!(matches!(result, Err(CfgMgrError::Transport { .. })));
        assert_eq!(intf.state(), SessionState::GlobalConfig);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_update_after_transport_failure_closes_bracket() {
        let mut channel = ScriptedChannel::new().fail_on("speed 1000", "connection reset");
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        let first = intf
            .update(&PropertySet::new(), &property_set! { Property::Speed => "1000" })
            .await;
        assert!(matches!(first, Err(CfgMgrError::Transport { .. })));
        assert_eq!(intf.state(), SessionState::InterfaceConfig);

        let desired = property_set! { Property::Duplex => "full" };
        let report = intf.update(&PropertySet::new(), &desired).await.unwrap();

        assert!(report.is_success());
        assert_eq!(intf.state(), SessionState::Idle);
        assert_eq!(
            channel.sent(),
            cmds(&[
                "conf t",
                "interface FastEthernet0/1",
                "speed 1000",
                "conf t",
                "interface FastEthernet0/1",
                "duplex full",
                "exit",
                "exit"
            ])
        );
    }

    #[tokio::test]
    async fn test_update_after_failed_bracket_entry() {
        let mut channel =
            ScriptedChannel::new().fail_on("interface FastEthernet0/1", "connection reset");
        let sink = CollectingErrorSink::new();
        let mut intf = Interface::new(NAME, &mut channel, &sink);

        assert!(intf.update(&PropertySet::new(), &PropertySet::new()).await.is_err());
        let second = intf.update(&PropertySet::new(), &PropertySet::new()).await;

        // still the transport error, never a session state error
        assert!(matches!(second, Err(CfgMgrError::Transport { .. })));
        assert_eq!(
            channel.sent(),
            cmds(&[
                "conf t",
                "interface FastEthernet0/1",
                "conf t",
                "interface FastEthernet0/1"
            ])
        );
    }
}
