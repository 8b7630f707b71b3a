/// Things worth hearing about. Sent synchronously from the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    Launch { x: f32, y: f32 },
    Explosion { x: f32, y: f32, sparks: usize },
}

/// Receiver for simulation events. Must not block; whatever it does with
/// the event has no say over the simulation.
pub trait EventSink {
    fn notify(&mut self, event: SimEvent);
}

/// Discards everything.
impl EventSink for () {
    fn notify(&mut self, _event: SimEvent) {}
}

/// Records everything, in order.
impl EventSink for Vec<SimEvent> {
    fn notify(&mut self, event: SimEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn notify(&mut self, event: SimEvent) {
        (**self).notify(event);
    }
}
