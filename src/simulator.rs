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

use log::{info, warn};
use std::time::Duration;

use crate::codec::frame_builder::Frame;
use crate::constants::{NUM_DISPLACEMENT_SENSOR, NUM_GYRO_AXIS};
use crate::enums::{Channel, DeviceClass, DeviceId, DigitalInputLine, DigitalOutputLine};
use crate::error::Result;
use crate::registry::device_record::DeviceRecord;
use crate::response::{
    digital_io::{
        parse_digital_output_reply, query_digital_output, set_digital_input, set_digital_output,
    },
    ilc_common::ServerIdentity,
    sensor::{report_accelerometer, report_displacement, report_gyro, report_inclinometer},
    IlcResponse,
};
use crate::router::Router;

/// Simulator of the hardware bus. Every operation builds one frame and sends
/// it on one channel.
pub struct Simulator {
    _router: Router,
}

impl Simulator {
    /// Create a new simulator.
    pub fn new(router: Router) -> Self {
        Self { _router: router }
    }

    /// Get the router.
    pub fn router(&self) -> &Router {
        &self._router
    }

    /// Set the inclinometer angle.
    ///
    /// # Arguments
    /// * `angle` - Angle in degree.
    ///
    /// # Returns
    /// Sent frame.
    pub fn set_inclinometer(&mut self, angle: f64) -> Result<Frame> {
        self.send(Channel::Inclinometer, report_inclinometer(angle))
    }

    /// Set the voltages of the accelerometer.
    ///
    /// # Arguments
    /// * `number` - Accelerometer number (1-4).
    /// * `elevation_voltage` - Voltage of the elevation axis in volt.
    /// * `azimuth_voltage` - Voltage of the azimuth axis in volt.
    ///
    /// # Returns
    /// Sent frame.
    pub fn set_accelerometer(
        &mut self,
        number: u8,
        elevation_voltage: f32,
        azimuth_voltage: f32,
    ) -> Result<Frame> {
        self.send(
            Channel::Accelerometer,
            report_accelerometer(number, elevation_voltage, azimuth_voltage),
        )
    }

    /// Set the displacement sensors.
    ///
    /// # Arguments
    /// * `values` - Displacement of the eight sensors in millimeter.
    ///
    /// # Returns
    /// Sent frame.
    pub fn set_displacement(&mut self, values: &[f64; NUM_DISPLACEMENT_SENSOR]) -> Result<Frame> {
        self.send(Channel::Displacement, report_displacement(values))
    }

    /// Set the gyro.
    ///
    /// # Arguments
    /// * `rates` - Angular rates of the x, y, and z axes in degree/sec.
    /// * `is_valid` - Data is valid or not.
    /// * `temperature` - Temperature in degree Celsius.
    ///
    /// # Returns
    /// Sent frame.
    pub fn set_gyro(
        &mut self,
        rates: &[f32; NUM_GYRO_AXIS],
        is_valid: bool,
        temperature: i32,
    ) -> Result<Frame> {
        self.send(Channel::Gyro, report_gyro(rates, is_valid, temperature))
    }

    /// Set the digital input line.
    pub fn set_digital_input(&mut self, line: DigitalInputLine, command: i32) -> Result<Frame> {
        self.send(Channel::DigitalInput, set_digital_input(line, command))
    }

    /// Set the digital output line.
    pub fn set_digital_output(&mut self, line: DigitalOutputLine, command: i32) -> Result<Frame> {
        self.send(Channel::DigitalOutput, set_digital_output(line, command))
    }

    /// Get the state of the digital output line. The call blocks until the
    /// reply arrives on the acknowledgement channel or the timeout.
    ///
    /// # Arguments
    /// * `line` - Digital output line.
    /// * `timeout` - Maximum time to wait for the reply.
    ///
    /// # Returns
    /// True if the line is high.
    pub fn get_digital_output_state(
        &mut self,
        line: DigitalOutputLine,
        timeout: Duration,
    ) -> Result<bool> {
        let frame = query_digital_output(line)?;
        let reply = self._router.request(
            Channel::DigitalOutput,
            &frame,
            timeout,
            |reply| reply.first() == Some(&(line as u8)),
        )?;

        parse_digital_output_reply(line, &reply)
    }

    /// Set the state of the device by sending its response.
    ///
    /// # Arguments
    /// * `id` - Device identifier.
    /// * `response` - Response with its parameters.
    ///
    /// # Returns
    /// Sent frame.
    pub fn set_device_state(&mut self, id: DeviceId, response: &IlcResponse) -> Result<Frame> {
        let (_, frame) = self._router.dispatch(id, response)?;

        Ok(frame)
    }

    /// Report the identity of every registered device in the registry order.
    ///
    /// # Returns
    /// Number of the sent frames.
    pub fn report_all_identities(&mut self) -> Result<usize> {
        let identities: Vec<(DeviceId, ServerIdentity)> = self
            ._router
            .registry()
            .records()
            .iter()
            .map(|record| (record.id, default_identity(record)))
            .collect();

        for (id, identity) in identities.iter() {
            self._router
                .dispatch(*id, &IlcResponse::ServerId(identity.clone()))?;
        }

        info!("Reported the identity of {} devices.", identities.len());

        Ok(identities.len())
    }

    /// Send the built frame on the channel.
    fn send(&mut self, channel: Channel, frame: Result<Frame>) -> Result<Frame> {
        let frame = frame.map_err(|error| {
            warn!("Reject the frame of the {:?} channel: {error}.", channel);
            error
        })?;

        self._router.send(channel, &frame)?;

        Ok(frame)
    }
}

/// Get the default identity of the device.
///
/// # Arguments
/// * `record` - Device record.
///
/// # Returns
/// Identity reported by the function code 17.
pub fn default_identity(record: &DeviceRecord) -> ServerIdentity {
    let (ilc_app_type, firmware_name, class_offset) = match record.class() {
        DeviceClass::HardpointActuator => (1, "Hardpoint", 0x0100),
        DeviceClass::ForceActuator => {
            if record.is_dual_axis() {
                (2, "DAA Force Actuator", 0x0200)
            } else {
                (2, "SAA Force Actuator", 0x0200)
            }
        }
        DeviceClass::HardpointMonitor => (7, "Hardpoint Monitor", 0x0300),
    };

    ServerIdentity {
        unique_id: (class_offset + record.id.number()) as u64,
        ilc_app_type: ilc_app_type,
        network_node_type: ilc_app_type,
        ilc_selected_options: 0,
        network_node_options: 2,
        major_revision: 1,
        minor_revision: 0,
        firmware_name: String::from(firmware_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use crate::enums::InnerLoopControlMode;
    use crate::error::SimulatorError;
    use crate::mock::mock_transport::{MockTransport, QueuedReplies, SentFrames};
    use crate::registry::device_registry::DeviceRegistry;

    fn create_simulator() -> (Simulator, SentFrames, QueuedReplies) {
        let registry = DeviceRegistry::from_files(
            Path::new("config/force_actuator_table.csv"),
            Path::new("config/hardpoint_actuator_table.csv"),
            Path::new("config/hardpoint_monitor_table.csv"),
        )
        .unwrap();

        let transport = MockTransport::new(false, true);
        let sent = transport.get_sent_reference();
        let replies = transport.get_reply_reference();

        (
            Simulator::new(Router::new(registry, Box::new(transport))),
            sent,
            replies,
        )
    }

    #[test]
    fn test_set_inclinometer() {
        let (mut simulator, sent, _) = create_simulator();

        let frame = simulator.set_inclinometer(36.001).unwrap();

        assert_eq!(
            frame.as_bytes(),
            &[9, 127, 3, 4, 140, 161, 0, 0, 0x1F, 0x46]
        );
        assert_eq!(sent.lock().unwrap()[0], (Channel::Inclinometer, frame));
    }

    #[test]
    fn test_set_inclinometer_rejected() {
        let (mut simulator, sent, _) = create_simulator();

        assert!(simulator.set_inclinometer(360.0).unwrap_err().is_validation());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_sensors() {
        let (mut simulator, sent, _) = create_simulator();

        simulator.set_accelerometer(4, 0.1, 0.2).unwrap();
        simulator.set_displacement(&[0.0; NUM_DISPLACEMENT_SENSOR]).unwrap();
        simulator.set_gyro(&[0.0; NUM_GYRO_AXIS], true, 20).unwrap();
        simulator
            .set_digital_input(DigitalInputLine::CellLightsOn, 1)
            .unwrap();
        simulator
            .set_digital_output(DigitalOutputLine::AirCommand, 0)
            .unwrap();

        let channels: Vec<Channel> = sent
            .lock()
            .unwrap()
            .iter()
            .map(|(channel, _)| *channel)
            .collect();

        assert_eq!(
            channels,
            vec![
                Channel::Accelerometer,
                Channel::Displacement,
                Channel::Gyro,
                Channel::DigitalInput,
                Channel::DigitalOutput,
            ]
        );
    }

    #[test]
    fn test_set_accelerometer_rejected() {
        let (mut simulator, sent, _) = create_simulator();

        assert!(simulator
            .set_accelerometer(0, 0.0, 0.0)
            .unwrap_err()
            .is_validation());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_get_digital_output_state() {
        let (mut simulator, sent, replies) = create_simulator();
        replies.lock().unwrap().push_back(vec![74, 1]);

        let state = simulator
            .get_digital_output_state(DigitalOutputLine::InterlockEnable, Duration::from_millis(50))
            .unwrap();

        assert!(state);

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].0, Channel::DigitalOutput);
        assert_eq!(sent[0].1.as_bytes(), &[1, 74]);
    }

    #[test]
    fn test_get_digital_output_state_timeout() {
        let (mut simulator, _, replies) = create_simulator();

        // Reply of another line is dropped.
        replies.lock().unwrap().push_back(vec![60, 1]);

        assert!(matches!(
            simulator.get_digital_output_state(
                DigitalOutputLine::InterlockEnable,
                Duration::from_millis(50)
            ),
            Err(SimulatorError::Timeout { .. })
        ));
    }

    #[test]
    fn test_set_device_state() {
        let (mut simulator, sent, _) = create_simulator();

        let frame = simulator
            .set_device_state(
                DeviceId::HardpointActuator(3),
                &IlcResponse::Mode(InnerLoopControlMode::Enabled),
            )
            .unwrap();

        assert_eq!(frame.as_bytes(), &[5, 3, 65, 2, 0, 2]);
        assert_eq!(sent.lock().unwrap()[0].0, Channel::SubnetE);
    }

    #[test]
    fn test_report_all_identities() {
        let (mut simulator, sent, _) = create_simulator();

        let number = simulator.report_all_identities().unwrap();

        assert_eq!(number, simulator.router().registry().len());

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), number);
        assert!(sent.iter().all(|(_, frame)| frame.as_bytes()[2] == 17));

        let first = &simulator.router().registry().records()[0];
        assert_eq!(sent[0].0, first.channel);
        assert_eq!(sent[0].1.as_bytes()[1], first.bus_address);
    }

    #[test]
    fn test_default_identity() {
        let (simulator, _, _) = create_simulator();
        let registry = simulator.router().registry();

        let identity = default_identity(registry.record(DeviceId::HardpointMonitor(6)).unwrap());

        assert_eq!(identity.unique_id, 0x0306);
        assert_eq!(identity.ilc_app_type, 7);
        assert_eq!(identity.firmware_name, "Hardpoint Monitor");
    }
}
