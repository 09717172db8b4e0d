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

use std::time::Duration;

use crate::codec::frame_builder::Frame;
use crate::enums::Channel;
use crate::error::Result;

/// Transport of the frames over the logical channels. The owner of the
/// transport is the only writer of every channel.
pub trait ChannelTransport {
    /// Send the frame as one datagram on the channel.
    ///
    /// # Arguments
    /// * `channel` - Outbound channel.
    /// * `frame` - Frame to send.
    ///
    /// # Returns
    /// Ok if the frame is sent.
    fn send(&mut self, channel: Channel, frame: &Frame) -> Result<()>;

    /// Receive one datagram from the channel.
    ///
    /// # Arguments
    /// * `channel` - Inbound channel.
    /// * `timeout` - Maximum time to wait.
    ///
    /// # Returns
    /// Received bytes.
    ///
    /// # Errors
    /// Timeout if nothing arrives before the deadline.
    fn receive(&mut self, channel: Channel, timeout: Duration) -> Result<Vec<u8>>;
}
