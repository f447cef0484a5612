//! Broadcast registry for every media element in the app
//!
//! Settings apply volume through the bus so callers never check which players
//! exist; an empty bus is a no-op and a disconnected player is pruned on the
//! next broadcast.

use std::sync::mpsc::Sender;

#[derive(Debug, Clone)]
pub enum PlayerCommand {
    Play { url: String },
    Stop,
    SetVolume(f32),
}

#[derive(Default)]
pub struct MediaBus {
    handles: Vec<Sender<PlayerCommand>>,
}

impl MediaBus {
    pub fn attach(&mut self, handle: Sender<PlayerCommand>) {
        self.handles.push(handle);
    }

    /// Set volume (0.0-1.0) on every attached player
    pub fn set_volume(&mut self, volume: f32) {
        self.broadcast(PlayerCommand::SetVolume(volume.clamp(0.0, 1.0)));
    }

    /// Stop every attached player
    pub fn stop_all(&mut self) {
        self.broadcast(PlayerCommand::Stop);
    }

    fn broadcast(&mut self, command: PlayerCommand) {
        self.handles
            .retain(|handle| handle.send(command.clone()).is_ok());
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn volume_reaches_every_attached_player() {
        let mut bus = MediaBus::default();
        let (tx1, rx1) = channel();
        let (tx2, rx2) = channel();
        bus.attach(tx1);
        bus.attach(tx2);

        bus.set_volume(0.7);

        for rx in [rx1, rx2] {
            match rx.try_recv().unwrap() {
                PlayerCommand::SetVolume(v) => assert!((v - 0.7).abs() < f32::EPSILON),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn empty_bus_is_a_noop() {
        let mut bus = MediaBus::default();
        assert!(bus.is_empty());
        bus.set_volume(0.5); // must not panic
        bus.stop_all();
    }

    #[test]
    fn volume_is_clamped() {
        let mut bus = MediaBus::default();
        let (tx, rx) = channel();
        bus.attach(tx);
        bus.set_volume(3.0);
        match rx.try_recv().unwrap() {
            PlayerCommand::SetVolume(v) => assert!((v - 1.0).abs() < f32::EPSILON),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn disconnected_players_are_pruned() {
        let mut bus = MediaBus::default();
        let (tx, rx) = channel();
        bus.attach(tx);
        drop(rx);
        bus.set_volume(0.5);
        assert!(bus.is_empty());
    }
}
