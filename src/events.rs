//! Synchronous publish/subscribe for state-change events. Subscribers run
//! before `publish` returns and receive the whole engine, so they may push
//! further resolvers; they must not mutate zones except through the
//! card-move service. Publication always happens outside a zone transition,
//! never mid-move.

use tracing::Level;
use uuid::Uuid;

use crate::{
    card::CardId,
    engine::Engine,
    moves::MoveReason,
    player::Seat,
    resolver::damage::DamageDescriptor,
    zone::ZoneRef,
};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BeforeDamage {
        damage: DamageDescriptor,
    },
    Damage {
        damage: DamageDescriptor,
        hp_after: i32,
    },
    AfterDamage {
        damage: DamageDescriptor,
    },
    HpLost {
        seat: Seat,
        amount: u32,
        hp_after: i32,
    },
    AfterHpLost {
        seat: Seat,
        amount: u32,
    },
    HpRecovered {
        seat: Seat,
        amount: u32,
        hp_after: i32,
    },
    CardMoved {
        card: CardId,
        from: ZoneRef,
        to: ZoneRef,
        reason: MoveReason,
    },
    BeforeJudgement {
        request_id: Uuid,
        owner: Seat,
    },
    AfterJudgement {
        request_id: Uuid,
        owner: Seat,
        success: bool,
    },
    WeaponTransferred {
        from: Seat,
        to: Seat,
        card: CardId,
    },
    BeforeJieDaoShaRenEffect {
        source: Seat,
        slasher: Seat,
        victim: Seat,
    },
    Dying {
        seat: Seat,
    },
    PlayerDied {
        seat: Seat,
    },
}

type Subscriber = Box<dyn FnMut(&mut Engine, &GameEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    history: Vec<GameEvent>,
}

impl EventBus {
    pub fn subscribe(&mut self, subscriber: impl FnMut(&mut Engine, &GameEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Everything published so far, in publication order.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    pub fn count_matching(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.history.iter().filter(|event| predicate(event)).count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("history", &self.history)
            .finish()
    }
}

impl Engine {
    /// Synchronous publication. The subscriber list is taken out for the
    /// duration of dispatch so subscribers get `&mut Engine`; subscriptions
    /// made during dispatch take effect from the next publish.
    pub fn publish(&mut self, event: GameEvent) {
        event!(Level::DEBUG, ?event, "publish");
        self.events.history.push(event.clone());

        let mut subscribers = std::mem::take(&mut self.events.subscribers);
        for subscriber in subscribers.iter_mut() {
            subscriber(self, &event);
        }
        let added = std::mem::take(&mut self.events.subscribers);
        self.events.subscribers = subscribers;
        self.events.subscribers.extend(added);
    }
}
