use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Opaque animation cues for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationClip {
    Fly,
    Dead,
}

/// Notifications the environment sends to the presentation layer.
///
/// The environment never reads anything back. Implementations decide what a call means
/// in their context, e.g. a scoreboard ignores score while its game-over flag is set.
pub trait GameHooks {
    fn add_score(&mut self, amount: u32);

    fn game_over(&mut self, ai_controlled: bool);

    fn play_clip(&mut self, clip: AnimationClip);

    fn reset_score(&mut self);
}

/// Discards every notification. Used for headless training.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl GameHooks for NullHooks {
    fn add_score(&mut self, _amount: u32) {}

    fn game_over(&mut self, _ai_controlled: bool) {}

    fn play_clip(&mut self, _clip: AnimationClip) {}

    fn reset_score(&mut self) {}
}

/// In-memory score display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub game_over: bool,
    pub ai_controlled: bool,
    pub last_clip: Option<AnimationClip>,
}

impl GameHooks for Scoreboard {
    fn add_score(&mut self, amount: u32) {
        if self.game_over {
            return;
        }
        self.score += amount;
    }

    fn game_over(&mut self, ai_controlled: bool) {
        self.game_over = true;
        self.ai_controlled = ai_controlled;
    }

    fn play_clip(&mut self, clip: AnimationClip) {
        self.last_clip = Some(clip);
    }

    fn reset_score(&mut self) {
        self.score = 0;
        self.game_over = false;
    }
}

/// Notification as a value, for forwarding across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    AddScore(u32),
    GameOver { ai_controlled: bool },
    PlayClip(AnimationClip),
    ResetScore,
}

/// Forwards notifications over a channel.
#[derive(Debug, Clone)]
pub struct ChannelHooks {
    sender: Sender<HookEvent>,
}

impl ChannelHooks {
    pub fn new() -> (Self, Receiver<HookEvent>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, event: HookEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.sender.send(event);
    }
}

impl GameHooks for ChannelHooks {
    fn add_score(&mut self, amount: u32) {
        self.send(HookEvent::AddScore(amount));
    }

    fn game_over(&mut self, ai_controlled: bool) {
        self.send(HookEvent::GameOver { ai_controlled });
    }

    fn play_clip(&mut self, clip: AnimationClip) {
        self.send(HookEvent::PlayClip(clip));
    }

    fn reset_score(&mut self) {
        self.send(HookEvent::ResetScore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scoreboard_freezes_after_game_over() {
        let mut board = Scoreboard::default();
        board.add_score(1);
        board.add_score(1);
        board.game_over(false);
        board.add_score(1);
        assert_eq!(board.score, 2);

        board.reset_score();
        board.add_score(1);
        assert_eq!(board.score, 1);
        assert!(!board.game_over);
    }

    #[test]
    fn test_channel_hooks_forward_in_order() {
        let (mut hooks, events) = ChannelHooks::new();
        hooks.reset_score();
        hooks.play_clip(AnimationClip::Fly);
        hooks.add_score(1);
        hooks.game_over(true);

        let received: Vec<HookEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                HookEvent::ResetScore,
                HookEvent::PlayClip(AnimationClip::Fly),
                HookEvent::AddScore(1),
                HookEvent::GameOver {
                    ai_controlled: true
                },
            ]
        );
    }

    #[test]
    fn test_channel_hooks_survive_dropped_receiver() {
        let (mut hooks, events) = ChannelHooks::new();
        drop(events);
        hooks.add_score(1);
    }
}
