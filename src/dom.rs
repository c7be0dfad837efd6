//! DOM-backed render surface for the countdown page.

use crate::celebration::Particle;
use crate::config::{CELEBRATION_ID, PARTICLES_ID, PARTICLE_CLASS, PULSE_CLASS, VISIBLE_CLASS};
use crate::error::BootError;
use crate::{Display, Field};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

pub struct DomDisplay {
    document: Document,
    fields: [HtmlElement; 4],
    overlay: HtmlElement,
    particle_host: HtmlElement,
}

fn element(document: &Document, id: &'static str) -> Result<HtmlElement, BootError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(BootError::MissingElement(id))
}

impl DomDisplay {
    /// Resolve every element the page must provide.
    pub fn from_document(document: &Document) -> Result<Self, BootError> {
        let [days, hours, minutes, seconds] = Field::ALL.map(Field::element_id);
        Ok(DomDisplay {
            document: document.clone(),
            fields: [
                element(document, days)?,
                element(document, hours)?,
                element(document, minutes)?,
                element(document, seconds)?,
            ],
            overlay: element(document, CELEBRATION_ID)?,
            particle_host: element(document, PARTICLES_ID)?,
        })
    }

    fn particle_element(&self, particle: &Particle) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.unchecked_into();
        el.set_class_name(PARTICLE_CLASS);
        let style = el.style();
        style.set_property("width", &format!("{:.1}px", particle.size_px))?;
        style.set_property("height", &format!("{:.1}px", particle.size_px))?;
        style.set_property("left", &format!("{:.2}%", particle.left_pct))?;
        style.set_property("top", &format!("{:.2}%", particle.top_pct))?;
        style.set_property("animation-duration", &format!("{:.2}s", particle.duration_s))?;
        style.set_property("animation-delay", &format!("{:.2}s", particle.delay_s))?;
        Ok(el)
    }

    fn show_celebration(&self, particles: &[Particle]) -> Result<(), JsValue> {
        for particle in particles {
            let el = self.particle_element(particle)?;
            self.particle_host.append_child(&el)?;
        }

        self.overlay.set_hidden(false);

        // Add the visible class one frame later so the transition starts
        // from the hidden state.
        let overlay = self.overlay.clone();
        let on_frame = Closure::once_into_js(move || {
            if let Err(err) = overlay.class_list().add_1(VISIBLE_CLASS) {
                warn!("Could not reveal celebration: {:?}", err);
            }
        });
        gloo_utils::window().request_animation_frame(on_frame.unchecked_ref())?;
        Ok(())
    }
}

/// Restart the CSS pulse by removing the class, forcing a reflow and adding it back.
fn pulse(el: &HtmlElement) -> Result<(), JsValue> {
    let classes = el.class_list();
    classes.remove_1(PULSE_CLASS)?;
    let _ = el.offset_width();
    classes.add_1(PULSE_CLASS)
}

impl Display for DomDisplay {
    fn write_field(&mut self, field: Field, text: &str, pulse_requested: bool) {
        let el = &self.fields[field as usize];
        el.set_text_content(Some(text));
        if pulse_requested {
            if let Err(err) = pulse(el) {
                warn!("Pulse on #{} failed: {:?}", field.element_id(), err);
            }
        }
    }

    fn celebrate(&mut self, particles: &[Particle]) {
        if let Err(err) = self.show_celebration(particles) {
            warn!("Celebration failed: {:?}", err);
        }
    }
}
