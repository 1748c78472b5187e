//=========================================================================
// Headless Window
//=========================================================================
//
// A `Window` without an OS surface. Input is scripted per frame and the
// window can be told to request closing after a number of frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::debug;

//=== Internal Dependencies ===============================================

use super::interface::{Window, WindowStatus};
use crate::core::input::InputEvent;
use crate::core::math::Vector4;
use crate::error::EngineResult;

//=== HeadlessWindow ======================================================

/// Fixed-size window that replays scripted input.
///
/// # Examples
///
/// ```
/// use tessel_engine::core::input::{InputEvent, KeyCode};
/// use tessel_engine::core::platform_bridge::{HeadlessWindow, Window, WindowStatus};
///
/// let mut window = HeadlessWindow::new(640, 480).close_after(2);
/// window.script_frame(vec![InputEvent::key_down(KeyCode::F1)]);
///
/// let mut sink = Vec::new();
/// assert_eq!(window.poll_events(&mut sink).unwrap(), WindowStatus::Open);
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    size: Vector4,
    scripted: VecDeque<Vec<InputEvent>>,
    close_after: Option<u64>,
    polls: u64,
    presented: u64,
}

impl HeadlessWindow {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Vector4::from_size(width, height),
            scripted: VecDeque::new(),
            close_after: None,
            polls: 0,
            presented: 0,
        }
    }

    /// Requests close on the poll after `frames` presented frames.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Queues the input delivered by the next unscripted poll.
    pub fn script_frame(&mut self, events: Vec<InputEvent>) {
        self.scripted.push_back(events);
    }

    /// Changes the reported size, as a window resize would.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.size = Vector4::from_size(width, height);
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> Vector4 {
        self.size
    }

    fn poll_events(&mut self, sink: &mut Vec<InputEvent>) -> EngineResult<WindowStatus> {
        self.polls += 1;

        if self.close_after.is_some_and(|limit| self.presented >= limit) {
            debug!(target: "platform", "Headless window closing after {} frames", self.presented);
            return Ok(WindowStatus::CloseRequested);
        }

        if let Some(events) = self.scripted.pop_front() {
            sink.extend(events);
        }
        Ok(WindowStatus::Open)
    }

    fn present(&mut self) -> EngineResult<()> {
        self.presented += 1;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn scripted_frames_are_delivered_in_order() {
        let mut window = HeadlessWindow::new(10, 10);
        window.script_frame(vec![InputEvent::key_down(KeyCode::KeyA)]);
        window.script_frame(vec![InputEvent::key_up(KeyCode::KeyA)]);

        let mut sink = Vec::new();
        window.poll_events(&mut sink).unwrap();
        window.poll_events(&mut sink).unwrap();
        window.poll_events(&mut sink).unwrap();

        assert_eq!(
            sink,
            vec![InputEvent::key_down(KeyCode::KeyA), InputEvent::key_up(KeyCode::KeyA)]
        );
        assert_eq!(window.polls(), 3);
    }

    #[test]
    fn close_is_requested_after_presented_frames() {
        let mut window = HeadlessWindow::new(10, 10).close_after(1);
        let mut sink = Vec::new();

        assert_eq!(window.poll_events(&mut sink).unwrap(), WindowStatus::Open);
        window.present().unwrap();
        assert_eq!(window.poll_events(&mut sink).unwrap(), WindowStatus::CloseRequested);
    }

    #[test]
    fn resize_changes_reported_size() {
        let mut window = HeadlessWindow::new(10, 10);
        window.resize(30, 20);
        assert_eq!(window.size(), Vector4::from_size(30, 20));
    }
}
