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

use log::info;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::codec::frame_builder::Frame;
use crate::enums::Channel;
use crate::error::{Result, SimulatorError};
use crate::interface::transport::ChannelTransport;

pub type SentFrames = Arc<Mutex<Vec<(Channel, Frame)>>>;
pub type QueuedReplies = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// Mock transport to record the sent frames without the network. The
/// acknowledgement channel serves the queued replies.
pub struct MockTransport {
    _sent: SentFrames,
    _replies: QueuedReplies,
    // Log the sent frames or not.
    _is_verbose: bool,
    // Keep the sent frames or not. The dry run only logs them.
    _is_recording: bool,
}

impl MockTransport {
    /// Create a new mock transport.
    ///
    /// # Arguments
    /// * `is_verbose` - Log every sent frame at the info level or not.
    /// * `is_recording` - Keep every sent frame in the sent frames or not.
    ///
    /// # Returns
    /// New mock transport.
    pub fn new(is_verbose: bool, is_recording: bool) -> Self {
        Self {
            _sent: Arc::new(Mutex::new(Vec::new())),
            _replies: Arc::new(Mutex::new(VecDeque::new())),
            _is_verbose: is_verbose,
            _is_recording: is_recording,
        }
    }

    /// Get the reference to the sent frames. This is useful to check the
    /// frames after the transport is moved into the router.
    pub fn get_sent_reference(&self) -> SentFrames {
        self._sent.clone()
    }

    /// Get the reference to the queued replies of the acknowledgement channel.
    pub fn get_reply_reference(&self) -> QueuedReplies {
        self._replies.clone()
    }
}

impl ChannelTransport for MockTransport {
    fn send(&mut self, channel: Channel, frame: &Frame) -> Result<()> {
        if self._is_verbose {
            info!("{:?} channel: {:?}.", channel, frame.as_bytes());
        }

        if self._is_recording {
            self._sent
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((channel, frame.clone()));
        }

        Ok(())
    }

    fn receive(&mut self, channel: Channel, timeout: Duration) -> Result<Vec<u8>> {
        let reply = if channel == Channel::Acknowledgement {
            self._replies
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front()
        } else {
            None
        };

        reply.ok_or(SimulatorError::Timeout {
            channel: channel,
            timeout: timeout,
        })
    }
}
