//! Collision notification messages.
//!
//! The physics step detects contact begins; the publishing system re-emits
//! them as ECS messages, filtered to entities that declared a collision
//! hook. Consumers read them with a `MessageReader<CollisionStarted>` during
//! the same tick; the mailbox is rotated at the start of the next tick so
//! stale notifications never linger.

use bevy_ecs::message::Message;

/// Two entities began touching during the last physics step.
///
/// The pair is unordered and reported once per contact begin. `hook` is the
/// script hook name declared by whichever participant requested
/// notifications (both, when both declared one, produce one message each).
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct CollisionStarted {
    /// Entity whose hook should run.
    pub entity: String,
    /// The other participant.
    pub other: String,
    /// Hook name from the entity's descriptor.
    pub hook: String,
}
