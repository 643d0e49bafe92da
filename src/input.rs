/// A fulfilled wait-for-key request: the key that was pressed and the
/// register the processor should store it in.
#[derive(Clone, Copy)]
pub struct KeyRequestResponse {
    pub key_code: u8,
    pub register: usize,
}

/// Input system for the `Chip8`. Tracks the pressed state of all 16 keys
/// and at most one outstanding wait-for-key request from the processor.
///
/// Key events arrive asynchronously from the embedding frontend via
/// [`set_key`](Input::set_key); the processor only ever reads.
#[derive(Default)]
pub struct Input {
    state: [bool; 16],
    waiting: bool,
    request_reg: usize,
    request_response: Option<KeyRequestResponse>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the pressed state of the given key code. A press while a
    /// wait-for-key request is outstanding fulfills the request.
    pub fn set_key(&mut self, key_code: u8, pressed: bool) {
        self.state[usize::from(key_code)] = pressed;
        if pressed && self.waiting {
            self.waiting = false;
            self.request_response = Some(KeyRequestResponse {
                key_code,
                register: self.request_reg,
            });
        }
    }

    /// Suspend the processor until the next key press, which will be
    /// stored in `register`.
    pub fn request_key_press(&mut self, register: usize) {
        self.waiting = true;
        self.request_reg = register;
    }

    /// Take the response to a fulfilled request, if any.
    pub fn request_response(&mut self) -> Option<KeyRequestResponse> {
        self.request_response.take()
    }

    /// Whether the processor is suspended waiting for a key press.
    pub fn waiting(&self) -> bool {
        self.waiting
    }

    pub fn is_key_pressed(&self, key_code: u8) -> bool {
        self.state[usize::from(key_code)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_updates_state() {
        let mut input = Input::new();
        input.set_key(0xA, true);
        assert!(input.is_key_pressed(0xA));
        input.set_key(0xA, false);
        assert!(!input.is_key_pressed(0xA));
    }

    #[test]
    fn press_fulfills_outstanding_request() {
        let mut input = Input::new();
        input.request_key_press(0x3);
        assert!(input.waiting());
        input.set_key(0xB, true);
        assert!(!input.waiting());
        let response = input.request_response().unwrap();
        assert_eq!(response.key_code, 0xB);
        assert_eq!(response.register, 0x3);
        assert!(input.request_response().is_none());
    }

    #[test]
    fn release_does_not_fulfill_request() {
        let mut input = Input::new();
        input.set_key(0xB, true);
        input.request_key_press(0x3);
        input.set_key(0xB, false);
        assert!(input.waiting());
        assert!(input.request_response().is_none());
    }
}
