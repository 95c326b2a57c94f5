use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the top-left corner of the canvas viewport
    pub position: Pos2,
    /// Whether the pointer is over the canvas viewport (and not over other UI)
    pub is_in_canvas: bool,
}

impl InputLocation {
    pub fn in_canvas(position: Pos2) -> Self {
        Self {
            position,
            is_in_canvas: true,
        }
    }

    pub fn outside(position: Pos2) -> Self {
        Self {
            position,
            is_in_canvas: false,
        }
    }
}

/// Toolkit-independent input consumed by the editor session
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        location: InputLocation,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// Mouse entered the viewport
    PointerEnter { location: InputLocation },
    /// Mouse left the viewport
    PointerLeave { last_known_location: InputLocation },
    /// Scroll wheel or touchpad pan, in points
    Scroll {
        location: InputLocation,
        delta: Vec2,
    },
    /// Pinch or Ctrl+wheel zoom; `factor` multiplies the current zoom
    Zoom {
        location: InputLocation,
        factor: f32,
    },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

const BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Last pointer position while inside the viewport, in screen coordinates
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an InputLocation relative to the viewport
    fn make_location(viewport: Rect, pos: Pos2, hovered: bool) -> InputLocation {
        InputLocation {
            position: (pos - viewport.min).to_pos2(),
            is_in_canvas: hovered && viewport.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// `viewport` is the screen rectangle of the canvas area and `hovered`
    /// whether egui reports the pointer over it (no window in between).
    pub fn process_input(&mut self, ctx: &Context, viewport: Rect, hovered: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let keyboard_taken = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let hover_pos = input.pointer.hover_pos();

            match (hover_pos, self.last_pointer_pos) {
                (Some(pos), last) => {
                    let location = Self::make_location(viewport, pos, hovered);
                    if last.is_none() {
                        events.push(InputEvent::PointerEnter { location });
                    }
                    if Some(pos) != last {
                        let held_buttons = BUTTONS
                            .into_iter()
                            .filter(|button| input.pointer.button_down(*button))
                            .collect();
                        events.push(InputEvent::PointerMove {
                            location,
                            held_buttons,
                        });
                    }
                    self.last_pointer_pos = Some(pos);
                }
                (None, Some(last)) => {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: Self::make_location(viewport, last, hovered),
                    });
                    self.last_pointer_pos = None;
                }
                (None, None) => {}
            }

            // Releases are reported even when the pointer left the window so strokes end cleanly
            let release_pos = hover_pos.or(self.last_pointer_pos).or(input.pointer.latest_pos());
            for button in BUTTONS {
                if input.pointer.button_pressed(button) {
                    if let Some(pos) = hover_pos {
                        events.push(InputEvent::PointerDown {
                            location: Self::make_location(viewport, pos, hovered),
                            button,
                        });
                    }
                }
                if input.pointer.button_released(button) {
                    if let Some(pos) = release_pos {
                        events.push(InputEvent::PointerUp {
                            location: Self::make_location(viewport, pos, hovered),
                            button,
                        });
                    }
                }
            }

            if let Some(pos) = hover_pos {
                let location = Self::make_location(viewport, pos, hovered);
                let zoom = input.zoom_delta();
                if (zoom - 1.0).abs() > f32::EPSILON {
                    events.push(InputEvent::Zoom {
                        location,
                        factor: zoom,
                    });
                }
                let scroll = input.smooth_scroll_delta;
                if scroll != Vec2::ZERO {
                    events.push(InputEvent::Scroll {
                        location,
                        delta: scroll,
                    });
                }
            }

            if !keyboard_taken {
                for event in &input.events {
                    if let egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } = event
                    {
                        events.push(InputEvent::KeyDown {
                            key: *key,
                            modifiers: *modifiers,
                        });
                    }
                }
            }
        });

        events
    }
}
