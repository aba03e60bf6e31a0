//! The event bus: fans referee events out to every subscribed handler.
//!
//! RULE: Handlers are notified synchronously, in subscription order.
//! A failing handler stops delivery; the error goes back to the caller
//! of `tick()`, which decides whether the match can continue.

use crate::{
    error::RefereeResult,
    event::GameEvent,
    event_handlers::EventMessageQueue,
};

/// What a handler may see of the referee while handling an event.
pub struct EventContext<'a> {
    /// Total match length in seconds.
    pub match_time:     u32,
    /// Seconds since the match started.
    pub elapsed:        f64,
    pub time_remaining: f64,
    /// On-screen message queue owned by the referee.
    pub messages:       &'a mut EventMessageQueue,
}

/// The contract every event consumer must fulfill.
pub trait EventHandler {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    fn handle(&mut self, ctx: &mut EventContext<'_>, event: &GameEvent) -> RefereeResult<()>;
}

#[derive(Default)]
pub struct Eventer {
    subscribers: Vec<Box<dyn EventHandler>>,
}

impl Eventer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn EventHandler>) {
        log::debug!("eventer: subscribed {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    pub fn event(&mut self, ctx: &mut EventContext<'_>, event: &GameEvent) -> RefereeResult<()> {
        for subscriber in &mut self.subscribers {
            subscriber.handle(ctx, event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefereeError;
    use std::{cell::RefCell, rc::Rc};

    struct Recording {
        name: &'static str,
        seen: Rc<RefCell<Vec<(&'static str, &'static str)>>>,
    }

    impl EventHandler for Recording {
        fn name(&self) -> &'static str { self.name }

        fn handle(&mut self, _ctx: &mut EventContext<'_>, event: &GameEvent) -> RefereeResult<()> {
            self.seen.borrow_mut().push((self.name, event.kind()));
            Ok(())
        }
    }

    struct Failing;

    impl EventHandler for Failing {
        fn name(&self) -> &'static str { "failing" }

        fn handle(&mut self, _ctx: &mut EventContext<'_>, _event: &GameEvent) -> RefereeResult<()> {
            Err(RefereeError::Other(anyhow::anyhow!("sink unavailable")))
        }
    }

    fn with_ctx<T>(f: impl FnOnce(&mut EventContext<'_>) -> T) -> T {
        let mut messages = EventMessageQueue::new();
        let mut ctx = EventContext {
            match_time: 600,
            elapsed: 0.0,
            time_remaining: 600.0,
            messages: &mut messages,
        };
        f(&mut ctx)
    }

    #[test]
    fn no_subscribers_by_default() {
        assert!(Eventer::new().subscriber_names().is_empty());
    }

    #[test]
    fn handlers_are_called_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut eventer = Eventer::new();
        eventer.subscribe(Box::new(Recording { name: "first", seen: seen.clone() }));
        eventer.subscribe(Box::new(Recording { name: "second", seen: seen.clone() }));
        assert_eq!(eventer.subscriber_names(), vec!["first", "second"]);

        with_ctx(|ctx| {
            eventer
                .event(ctx, &GameEvent::MatchStart { total_match_time: 600 })
                .unwrap();
        });

        assert_eq!(
            *seen.borrow(),
            vec![("first", "MATCH_START"), ("second", "MATCH_START")]
        );
    }

    #[test]
    fn handler_error_stops_delivery_and_propagates() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut eventer = Eventer::new();
        eventer.subscribe(Box::new(Failing));
        eventer.subscribe(Box::new(Recording { name: "after", seen: seen.clone() }));

        let result = with_ctx(|ctx| eventer.event(ctx, &GameEvent::MatchStart { total_match_time: 600 }));

        assert!(result.is_err());
        assert!(seen.borrow().is_empty());
    }
}
