// This file is part of ts_m1m3_simulator.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::{debug, warn};
use std::time::{Duration, Instant};

use crate::codec::frame_builder::Frame;
use crate::enums::{Channel, DeviceId};
use crate::error::{Result, SimulatorError};
use crate::interface::transport::ChannelTransport;
use crate::registry::device_registry::DeviceRegistry;
use crate::response::IlcResponse;

/// Router to build the frame of a device and hand it to the channel. Each call
/// produces exactly one frame for exactly one channel, without retry and
/// buffering.
pub struct Router {
    _registry: DeviceRegistry,
    _transport: Box<dyn ChannelTransport + Send>,
}

impl Router {
    /// Create a new router.
    ///
    /// # Arguments
    /// * `registry` - Device registry.
    /// * `transport` - Transport of the channels. The router is the only writer
    /// of the channels.
    ///
    /// # Returns
    /// New router.
    pub fn new(registry: DeviceRegistry, transport: Box<dyn ChannelTransport + Send>) -> Self {
        Self {
            _registry: registry,
            _transport: transport,
        }
    }

    /// Get the device registry.
    pub fn registry(&self) -> &DeviceRegistry {
        &self._registry
    }

    /// Build the response of the device.
    ///
    /// # Arguments
    /// * `id` - Device identifier.
    /// * `response` - Response with its parameters.
    ///
    /// # Returns
    /// Channel of the device and the frame.
    pub fn route(&self, id: DeviceId, response: &IlcResponse) -> Result<(Channel, Frame)> {
        let record = self._registry.record(id)?;

        let kind = response.kind();
        if !kind.applies_to(record.class()) {
            return Err(SimulatorError::UnsupportedResponse {
                kind: kind,
                device: id,
            });
        }

        if response.is_dual_axis() && !record.is_dual_axis() {
            return Err(SimulatorError::validation(
                &format!("secondary cylinder force of {id}"),
                "Some",
                "None for the single-axis actuator",
            ));
        }

        let frame = response.build(record.bus_address)?;

        Ok((record.channel, frame))
    }

    /// Build the response of the device and send it.
    ///
    /// # Arguments
    /// * `id` - Device identifier.
    /// * `response` - Response with its parameters.
    ///
    /// # Returns
    /// Channel of the device and the sent frame.
    pub fn dispatch(&mut self, id: DeviceId, response: &IlcResponse) -> Result<(Channel, Frame)> {
        let (channel, frame) = self.route(id, response).map_err(|error| {
            warn!("Reject the {:?} of {id}: {error}.", response.kind());
            error
        })?;

        self.send(channel, &frame)?;

        Ok((channel, frame))
    }

    /// Send the frame on the outbound channel.
    ///
    /// # Arguments
    /// * `channel` - Outbound channel.
    /// * `frame` - Frame to send.
    ///
    /// # Returns
    /// Ok if the frame is sent.
    pub fn send(&mut self, channel: Channel, frame: &Frame) -> Result<()> {
        if !channel.is_outbound() {
            warn!("Reject the frame on the inbound {:?} channel.", channel);
            return Err(SimulatorError::validation(
                "channel",
                format!("{:?}", channel),
                "outbound channel",
            ));
        }

        debug!(
            "Dispatch {} bytes on {:?}: {:?}.",
            frame.len(),
            channel,
            frame.as_bytes()
        );

        self._transport.send(channel, frame).map_err(|error| {
            warn!("Failed to send the frame on {:?}: {error}.", channel);
            error
        })
    }

    /// Send the request and wait for one reply on the acknowledgement channel.
    ///
    /// # Arguments
    /// * `channel` - Outbound channel of the request.
    /// * `frame` - Request frame.
    /// * `timeout` - Maximum time to wait for the reply.
    /// * `is_expected` - Check the reply belongs to the request. The other
    /// replies are dropped.
    ///
    /// # Returns
    /// Reply bytes.
    ///
    /// # Errors
    /// Timeout if no expected reply arrives before the deadline.
    pub fn request<F>(
        &mut self,
        channel: Channel,
        frame: &Frame,
        timeout: Duration,
        is_expected: F,
    ) -> Result<Vec<u8>>
    where
        F: Fn(&[u8]) -> bool,
    {
        self.send(channel, frame)?;

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            let reply = self
                ._transport
                .receive(Channel::Acknowledgement, remaining)
                .map_err(|error| match error {
                    SimulatorError::Timeout { .. } => SimulatorError::Timeout {
                        channel: Channel::Acknowledgement,
                        timeout: timeout,
                    },
                    other => other,
                })?;

            if is_expected(&reply) {
                return Ok(reply);
            }

            debug!("Drop the unexpected acknowledgement: {:?}.", reply);
        }

        warn!("No acknowledgement of the {:?} request within {:?}.", channel, timeout);

        Err(SimulatorError::Timeout {
            channel: Channel::Acknowledgement,
            timeout: timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use crate::codec::frame_builder::build_sensor_frame;
    use crate::enums::InnerLoopControlMode;
    use crate::mock::mock_transport::{MockTransport, QueuedReplies, SentFrames};

    fn create_router() -> (Router, SentFrames, QueuedReplies) {
        let registry = DeviceRegistry::from_files(
            Path::new("config/force_actuator_table.csv"),
            Path::new("config/hardpoint_actuator_table.csv"),
            Path::new("config/hardpoint_monitor_table.csv"),
        )
        .unwrap();

        let transport = MockTransport::new(false, true);
        let sent = transport.get_sent_reference();
        let replies = transport.get_reply_reference();

        (Router::new(registry, Box::new(transport)), sent, replies)
    }

    struct FailingTransport;

    impl ChannelTransport for FailingTransport {
        fn send(&mut self, _channel: Channel, _frame: &Frame) -> Result<()> {
            Err(SimulatorError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "destination is down",
            )))
        }

        fn receive(&mut self, channel: Channel, timeout: Duration) -> Result<Vec<u8>> {
            Err(SimulatorError::Timeout {
                channel: channel,
                timeout: timeout,
            })
        }
    }

    fn find_force_actuator(router: &Router, is_dual_axis: bool) -> DeviceId {
        router
            .registry()
            .records()
            .iter()
            .find(|record| {
                (record.id.class() == crate::enums::DeviceClass::ForceActuator)
                    && (record.is_dual_axis() == is_dual_axis)
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_route() {
        let (router, sent, _) = create_router();

        let response = IlcResponse::ServerStatus {
            mode: InnerLoopControlMode::Enabled,
            status: 512,
            faults: 256,
        };
        let (channel, frame) = router
            .route(DeviceId::ForceActuator(101), &response)
            .unwrap();

        assert_eq!(channel, Channel::SubnetA);
        assert_eq!(frame.as_bytes(), &[8, 1, 18, 5, 2, 2, 0, 1, 0]);

        // Nothing is sent.
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_route_hardpoint_monitor() {
        let (router, _, _) = create_router();

        let (channel, frame) = router
            .route(DeviceId::HardpointMonitor(2), &IlcResponse::Reset)
            .unwrap();

        assert_eq!(channel, Channel::SubnetE);
        assert_eq!(frame.as_bytes(), &[3, 85, 107, 0]);
    }

    #[test]
    fn test_route_not_found() {
        let (router, _, _) = create_router();

        assert!(matches!(
            router.route(DeviceId::ForceActuator(150), &IlcResponse::Reset),
            Err(SimulatorError::NotFound(DeviceId::ForceActuator(150)))
        ));
    }

    #[test]
    fn test_route_unsupported() {
        let (router, _, _) = create_router();

        let response = IlcResponse::StepMotor {
            status: 0,
            encoder: 0,
            force: 0.0,
        };

        assert!(matches!(
            router.route(DeviceId::ForceActuator(101), &response),
            Err(SimulatorError::UnsupportedResponse { .. })
        ));
        assert!(router
            .route(DeviceId::HardpointActuator(1), &response)
            .is_ok());
    }

    #[test]
    fn test_route_dual_axis() {
        let (router, _, _) = create_router();

        let single = find_force_actuator(&router, false);
        let dual = find_force_actuator(&router, true);

        let response_dual = IlcResponse::PneumaticForce {
            status: 0,
            primary: 1.0,
            secondary: Some(2.0),
        };
        let response_single = IlcResponse::PneumaticForce {
            status: 0,
            primary: 1.0,
            secondary: None,
        };

        assert!(router.route(dual, &response_dual).is_ok());
        assert!(router.route(dual, &response_single).is_ok());
        assert!(router.route(single, &response_single).is_ok());
        assert!(router
            .route(single, &response_dual)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_dispatch() {
        let (mut router, sent, _) = create_router();

        let (channel, frame) = router
            .dispatch(DeviceId::ForceActuator(301), &IlcResponse::Reset)
            .unwrap();

        assert_eq!(channel, Channel::SubnetC);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], (channel, frame));
    }

    #[test]
    fn test_dispatch_rejected_is_not_sent() {
        let (mut router, sent, _) = create_router();

        assert!(router
            .dispatch(DeviceId::HardpointActuator(9), &IlcResponse::Reset)
            .is_err());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_transport_failure() {
        let (router, _, _) = create_router();
        let mut router = Router::new(
            DeviceRegistry::new(router.registry().records().to_vec()).unwrap(),
            Box::new(FailingTransport),
        );

        assert!(matches!(
            router.dispatch(DeviceId::ForceActuator(101), &IlcResponse::Reset),
            Err(SimulatorError::Io(_))
        ));
    }

    #[test]
    fn test_send_acknowledgement_channel() {
        let (mut router, _, _) = create_router();

        let frame = build_sensor_frame(&[1]).unwrap();

        assert!(router
            .send(Channel::Acknowledgement, &frame)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_request() {
        let (mut router, sent, replies) = create_router();
        {
            let mut replies = replies.lock().unwrap();
            replies.push_back(vec![61, 0]);
            replies.push_back(vec![60, 1]);
        }

        let frame = build_sensor_frame(&[60]).unwrap();
        let reply = router
            .request(
                Channel::DigitalOutput,
                &frame,
                Duration::from_millis(100),
                |reply| reply.first() == Some(&60),
            )
            .unwrap();

        assert_eq!(reply, vec![60, 1]);
        assert_eq!(sent.lock().unwrap()[0].0, Channel::DigitalOutput);
    }

    #[test]
    fn test_request_timeout() {
        let (mut router, _, _) = create_router();

        let frame = build_sensor_frame(&[60]).unwrap();
        let timeout = Duration::from_millis(50);

        assert!(matches!(
            router.request(Channel::DigitalOutput, &frame, timeout, |_| true),
            Err(SimulatorError::Timeout { timeout: t, .. }) if t == timeout
        ));
    }
}
