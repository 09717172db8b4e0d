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

use log::{debug, info};
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::net::UdpSocket;
use std::time::Duration;
use strum::IntoEnumIterator;

use crate::codec::frame_builder::Frame;
use crate::config::SimulatorConfig;
use crate::constants::{ALL_HOST, MAX_DATAGRAM_SIZE};
use crate::enums::Channel;
use crate::error::{Result, SimulatorError};
use crate::interface::transport::ChannelTransport;

// Shortest read timeout. The socket refuses the zero timeout.
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// UDP transport. Each outbound channel has its own socket connected to the
/// destination of the channel.
pub struct UdpTransport {
    _sockets: HashMap<Channel, UdpSocket>,
    // Socket bound to the local acknowledgement port.
    _socket_acknowledgement: UdpSocket,
    // Buffer to read the datagram.
    _buffer: Vec<u8>,
}

impl UdpTransport {
    /// Create a new UDP transport and bind the channels.
    ///
    /// # Arguments
    /// * `config` - Configuration of the channel binding.
    ///
    /// # Returns
    /// New UDP transport.
    pub fn new(config: &SimulatorConfig) -> Result<Self> {
        let mut sockets = HashMap::new();
        for channel in Channel::iter().filter(|channel| channel.is_outbound()) {
            let socket = UdpSocket::bind(format!("{ALL_HOST}:0"))?;
            let destination = format!("{}:{}", config.host, config.port(channel));
            socket.connect(&destination)?;

            info!("{:?} channel is bound to {destination}.", channel);
            sockets.insert(channel, socket);
        }

        let socket_acknowledgement = UdpSocket::bind(format!(
            "{ALL_HOST}:{}",
            config.port(Channel::Acknowledgement)
        ))?;
        info!(
            "Acknowledgement channel listens on {}.",
            socket_acknowledgement.local_addr()?
        );

        Ok(Self {
            _sockets: sockets,
            _socket_acknowledgement: socket_acknowledgement,
            _buffer: vec![0; MAX_DATAGRAM_SIZE],
        })
    }

    /// Get the local port of the acknowledgement channel.
    ///
    /// # Returns
    /// Port number. -1 if it is not available.
    pub fn get_port_acknowledgement(&self) -> i32 {
        match self._socket_acknowledgement.local_addr() {
            Ok(addr) => addr.port() as i32,
            Err(_) => -1,
        }
    }
}

impl ChannelTransport for UdpTransport {
    fn send(&mut self, channel: Channel, frame: &Frame) -> Result<()> {
        let socket = self._sockets.get(&channel).ok_or_else(|| {
            SimulatorError::Io(io::Error::new(
                ErrorKind::Unsupported,
                format!("{:?} channel is not outbound", channel),
            ))
        })?;

        socket.send(frame.as_bytes())?;
        debug!("Sent {} bytes on {:?}.", frame.len(), channel);

        Ok(())
    }

    fn receive(&mut self, channel: Channel, timeout: Duration) -> Result<Vec<u8>> {
        if channel != Channel::Acknowledgement {
            return Err(SimulatorError::Io(io::Error::new(
                ErrorKind::Unsupported,
                format!("{:?} channel is not inbound", channel),
            )));
        }

        self._socket_acknowledgement
            .set_read_timeout(Some(timeout.max(MIN_READ_TIMEOUT)))?;

        match self._socket_acknowledgement.recv(&mut self._buffer) {
            Ok(size) => {
                debug!("Received {size} bytes on {:?}.", channel);
                Ok(self._buffer[..size].to_vec())
            }
            Err(error)
                if (error.kind() == ErrorKind::WouldBlock)
                    || (error.kind() == ErrorKind::TimedOut) =>
            {
                Err(SimulatorError::Timeout {
                    channel: channel,
                    timeout: timeout,
                })
            }
            Err(error) => Err(SimulatorError::Io(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use crate::codec::frame_builder::build_sensor_frame;
    use crate::constants::LOCAL_HOST;

    fn create_transport() -> (UdpTransport, UdpSocket) {
        // Control software that listens on the inclinometer channel.
        let receiver = UdpSocket::bind(format!("{LOCAL_HOST}:0")).unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();

        let mut config = SimulatorConfig::from_file(Path::new("config/parameters_app.yaml")).unwrap();
        config.host = String::from(LOCAL_HOST);
        config.port_inclinometer = receiver.local_addr().unwrap().port();
        config.port_acknowledgement = 0;

        (UdpTransport::new(&config).unwrap(), receiver)
    }

    #[test]
    fn test_send() {
        let (mut transport, receiver) = create_transport();

        let frame = build_sensor_frame(&[1, 2, 3]).unwrap();
        transport.send(Channel::Inclinometer, &frame).unwrap();

        let mut buffer = [0; 16];
        let size = receiver.recv(&mut buffer).unwrap();

        assert_eq!(&buffer[..size], &[3, 1, 2, 3]);
    }

    #[test]
    fn test_send_acknowledgement_channel() {
        let (mut transport, _) = create_transport();

        let frame = build_sensor_frame(&[1]).unwrap();

        assert!(matches!(
            transport.send(Channel::Acknowledgement, &frame),
            Err(SimulatorError::Io(_))
        ));
    }

    #[test]
    fn test_receive() {
        let (mut transport, _) = create_transport();

        let port = transport.get_port_acknowledgement();
        assert!(port > 0);

        let sender = UdpSocket::bind(format!("{LOCAL_HOST}:0")).unwrap();
        sender
            .send_to(&[60, 1], format!("{LOCAL_HOST}:{port}"))
            .unwrap();

        let reply = transport
            .receive(Channel::Acknowledgement, Duration::from_millis(500))
            .unwrap();

        assert_eq!(reply, vec![60, 1]);
    }

    #[test]
    fn test_receive_timeout() {
        let (mut transport, _) = create_transport();

        let timeout = Duration::from_millis(20);

        assert!(matches!(
            transport.receive(Channel::Acknowledgement, timeout),
            Err(SimulatorError::Timeout {
                channel: Channel::Acknowledgement,
                ..
            })
        ));
        assert!(matches!(
            transport.receive(Channel::SubnetA, timeout),
            Err(SimulatorError::Io(_))
        ));
    }
}
