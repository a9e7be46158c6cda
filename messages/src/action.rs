//! Replicated animation actions.

use codec::{DiffField, Differential};

/// An animation graph event raised by an actor.
///
/// Sent as a differential: only fields that changed since the previous
/// action known to the receiver go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionEvent {
    pub tick: u64,
    pub actor_id: u32,
    pub action_id: u32,
    pub target_id: u32,
    pub idle_id: u32,
    pub state1: u32,
    pub state2: u32,
    pub kind: u8,
    pub event_name: String,
    pub target_event_name: String,
}

fn event_name(action: &ActionEvent) -> &str {
    &action.event_name
}

fn target_event_name(action: &ActionEvent) -> &str {
    &action.target_event_name
}

impl Differential for ActionEvent {
    const NAME: &'static str = "ActionEvent";
    const FIELDS: &'static [DiffField<Self>] = &[
        DiffField::uint("tick", 64, |a: &Self| a.tick, |a: &mut Self, v| a.tick = v),
        DiffField::uint(
            "actor_id",
            32,
            |a: &Self| u64::from(a.actor_id),
            |a: &mut Self, v| a.actor_id = v as u32,
        ),
        DiffField::uint(
            "action_id",
            32,
            |a: &Self| u64::from(a.action_id),
            |a: &mut Self, v| a.action_id = v as u32,
        ),
        DiffField::uint(
            "target_id",
            32,
            |a: &Self| u64::from(a.target_id),
            |a: &mut Self, v| a.target_id = v as u32,
        ),
        DiffField::uint(
            "idle_id",
            32,
            |a: &Self| u64::from(a.idle_id),
            |a: &mut Self, v| a.idle_id = v as u32,
        ),
        DiffField::uint(
            "state1",
            32,
            |a: &Self| u64::from(a.state1),
            |a: &mut Self, v| a.state1 = v as u32,
        ),
        DiffField::uint(
            "state2",
            32,
            |a: &Self| u64::from(a.state2),
            |a: &mut Self, v| a.state2 = v as u32,
        ),
        DiffField::uint(
            "kind",
            8,
            |a: &Self| u64::from(a.kind),
            |a: &mut Self, v| a.kind = v as u8,
        ),
        DiffField::text("event_name", event_name, |a: &mut Self, v| a.event_name = v),
        DiffField::text("target_event_name", target_event_name, |a: &mut Self, v| {
            a.target_event_name = v;
        }),
    ];
}
