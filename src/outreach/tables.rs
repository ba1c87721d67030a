//! Hand-authored reference tables for the Colombian hospitality verticals.
//!
//! Loss figures are marketing ranges in USD per month. They are literals, not
//! the output of any calculation; deployments adjust them through
//! `outreach.loss_overrides` in the config file.

use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use crate::models::Category;
use super::psychology::{Framework, Language};
use super::signals::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossRange {
    pub min: i64,
    pub max: i64,
}

impl LossRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One row of a category's offer table: if every required signal fired,
/// recommend this offer.
#[derive(Debug, Serialize)]
pub struct OfferRule {
    pub requires: &'static [Signal],
    pub offer: &'static str,
    pub loss: LossRange,
    pub framework: Framework,
    pub pain_es: &'static str,
    pub pain_en: &'static str,
}

/// Setup fee and monthly retainer the sales team quotes, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRange {
    pub setup_min: i64,
    pub setup_max: i64,
    pub monthly_min: i64,
    pub monthly_max: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfile {
    pub category: Category,
    pub automations: &'static [&'static str],
    pub hooks_es: &'static [&'static str],
    pub hooks_en: &'static [&'static str],
    pub ticket: TicketRange,
    /// Ordered by priority; the first rule whose requirements hold wins.
    pub offers: &'static [OfferRule],
    pub default_offer: OfferRule,
}

impl CategoryProfile {
    pub fn hooks(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::Es => self.hooks_es,
            Language::En => self.hooks_en,
        }
    }
}

const fn rule(
    requires: &'static [Signal],
    offer: &'static str,
    min: i64,
    max: i64,
    framework: Framework,
    pain_es: &'static str,
    pain_en: &'static str,
) -> OfferRule {
    OfferRule { requires, offer, loss: LossRange::new(min, max), framework, pain_es, pain_en }
}

use super::psychology::Framework::{LossAversion, Reciprocity, Scarcity, SocialProof};
use super::signals::Signal::{LowReviews, ManualBooking, NoWebsite, OtaDependent, SlowResponse, SocialOnly};

pub static PROFILES: [CategoryProfile; 9] = [
    CategoryProfile {
        category: Category::Restaurant,
        automations: &[
            "AI reservation bot on WhatsApp",
            "automatic Google review requests",
            "digital menu with online ordering",
            "no-show reminders",
        ],
        hooks_es: &[
            "Cada mesa vacía un viernes es plata que no vuelve.",
            "Sus clientes ya lo buscan en Google antes de llegar.",
            "Un bot contesta reservas a las 11 de la noche, su equipo no.",
        ],
        hooks_en: &[
            "Every empty table on a Friday is money that never comes back.",
            "Your guests already look you up on Google before they arrive.",
            "A bot answers bookings at 11pm; your staff doesn't.",
        ],
        ticket: TicketRange { setup_min: 800, setup_max: 2500, monthly_min: 150, monthly_max: 400 },
        offers: &[
            rule(&[NoWebsite, LowReviews], "AI Booking Bot + Review Management System", 2000, 5000, LossAversion,
                "no tiene dónde reservar en línea y tiene muy pocas reseñas para generar confianza",
                "there is nowhere to book online and too few reviews to build trust"),
            rule(&[ManualBooking], "WhatsApp AI Reservation Assistant", 1500, 4000, Reciprocity,
                "las reservas dependen de que alguien conteste el teléfono",
                "bookings depend on someone picking up the phone"),
            rule(&[LowReviews], "Automated Review Generation System", 1000, 3000, SocialProof,
                "sus reseñas en Google no reflejan la calidad de su cocina",
                "your Google reviews don't reflect the quality of your food"),
            rule(&[NoWebsite], "AI-Powered Website + Online Booking", 1500, 3500, LossAversion,
                "los turistas que lo buscan en Google no encuentran una web para reservar",
                "tourists searching on Google find no website to book from"),
            rule(&[SlowResponse], "24/7 WhatsApp Auto-Responder", 1000, 2500, Scarcity,
                "los mensajes tardan horas en recibir respuesta",
                "messages wait hours for an answer"),
        ],
        default_offer: rule(&[], "AI Customer Concierge for WhatsApp & Instagram", 800, 2000, Reciprocity,
            "buena parte de las consultas por WhatsApp e Instagram se responden a mano",
            "most WhatsApp and Instagram questions are answered by hand"),
    },
    CategoryProfile {
        category: Category::Hotel,
        automations: &[
            "direct booking engine",
            "multilingual AI guest concierge",
            "post-stay review requests",
            "upsell messages before check-in",
        ],
        hooks_es: &[
            "Cada reserva por Booking le deja entre 15% y 20% a la OTA.",
            "El huésped extranjero escribe a las 3 a.m. hora de Colombia.",
            "Un huésped que reservó directo vuelve y lo recomienda.",
        ],
        hooks_en: &[
            "Every Booking.com reservation hands 15-20% to the OTA.",
            "Foreign guests write at 3am Colombian time.",
            "Guests who book direct come back and refer friends.",
        ],
        ticket: TicketRange { setup_min: 1500, setup_max: 5000, monthly_min: 300, monthly_max: 900 },
        offers: &[
            rule(&[OtaDependent], "Direct Booking Engine + OTA Commission Recovery", 3000, 8000, LossAversion,
                "la mayoría de sus reservas pasan por OTAs que cobran comisión",
                "most of your bookings go through OTAs that charge commission"),
            rule(&[NoWebsite, ManualBooking], "Direct Booking Website + WhatsApp AI Concierge", 2500, 6000, LossAversion,
                "no tiene web propia y las reservas se coordinan a mano por teléfono",
                "there is no own website and bookings are coordinated by phone"),
            rule(&[SlowResponse], "24/7 Multilingual AI Guest Concierge", 2000, 5000, Scarcity,
                "las consultas de huéspedes extranjeros tardan horas en responderse",
                "questions from foreign guests take hours to get answered"),
            rule(&[LowReviews], "Guest Review Automation + Reputation Dashboard", 1500, 4000, SocialProof,
                "su calificación está por debajo de los hoteles vecinos",
                "your rating sits below the hotels next door"),
        ],
        default_offer: rule(&[], "AI Guest Experience Automation", 1500, 3500, Reciprocity,
            "la comunicación antes y después de la estadía es manual",
            "pre- and post-stay communication is manual"),
    },
    CategoryProfile {
        category: Category::Hostel,
        automations: &[
            "direct booking widget",
            "WhatsApp check-in bot",
            "tour and activity upsells",
            "review requests at checkout",
        ],
        hooks_es: &[
            "Los mochileros reservan desde el celular en el último minuto.",
            "Hostelworld se queda con una parte de cada cama.",
        ],
        hooks_en: &[
            "Backpackers book from their phone at the last minute.",
            "Hostelworld keeps a cut of every bed.",
        ],
        ticket: TicketRange { setup_min: 600, setup_max: 1500, monthly_min: 120, monthly_max: 300 },
        offers: &[
            rule(&[OtaDependent], "Direct Booking Engine + Hostelworld Commission Recovery", 1500, 4000, LossAversion,
                "casi todas sus camas se venden por plataformas con comisión",
                "almost every bed is sold through commission platforms"),
            rule(&[SlowResponse], "Multilingual WhatsApp Check-in Bot", 800, 2000, Scarcity,
                "los viajeros esperan horas para confirmar su llegada",
                "travellers wait hours to confirm their arrival"),
            rule(&[LowReviews], "Review Automation for Backpacker Platforms", 600, 1800, SocialProof,
                "tiene pocas reseñas frente a otros hostales de la zona",
                "you have few reviews compared to nearby hostels"),
        ],
        default_offer: rule(&[], "AI Front Desk for WhatsApp", 600, 1500, Reciprocity,
            "la recepción responde las mismas preguntas todo el día",
            "reception answers the same questions all day"),
    },
    CategoryProfile {
        category: Category::Bar,
        automations: &[
            "Instagram DM table booking",
            "event ticketing",
            "WhatsApp promo broadcasts",
            "loyalty program",
        ],
        hooks_es: &[
            "El jueves se decide dónde se sale el sábado.",
            "Un DM sin respuesta es un grupo de cinco que se va a otro bar.",
        ],
        hooks_en: &[
            "Thursday is when people decide where to go on Saturday.",
            "An unanswered DM is a group of five going to another bar.",
        ],
        ticket: TicketRange { setup_min: 700, setup_max: 2000, monthly_min: 150, monthly_max: 350 },
        offers: &[
            rule(&[SocialOnly, ManualBooking], "Instagram DM Reservation Bot + Event Ticketing", 1200, 3000, Scarcity,
                "las reservas de mesa llegan por Instagram y se confirman a mano",
                "table bookings arrive on Instagram and are confirmed by hand"),
            rule(&[LowReviews], "Review Booster + Loyalty Program Automation", 800, 2500, SocialProof,
                "sus reseñas no muestran el ambiente que tiene el bar",
                "your reviews don't show the vibe the bar has"),
            rule(&[NoWebsite], "Event Landing Page + Table Booking", 1000, 2500, LossAversion,
                "no hay una página donde ver eventos y reservar mesa",
                "there is no page to see events and book a table"),
        ],
        default_offer: rule(&[], "Promo Broadcast Automation for WhatsApp", 600, 1500, Reciprocity,
            "las promociones se anuncian solo en historias que duran 24 horas",
            "promotions only live in 24-hour stories"),
    },
    CategoryProfile {
        category: Category::Cafe,
        automations: &[
            "digital loyalty card",
            "pickup ordering page",
            "review requests by WhatsApp",
        ],
        hooks_es: &[
            "Un cliente frecuente vale más que diez de paso.",
            "El pedido para llevar se decide en el camino.",
        ],
        hooks_en: &[
            "One regular is worth more than ten passers-by.",
            "Takeaway orders are decided on the way.",
        ],
        ticket: TicketRange { setup_min: 400, setup_max: 1200, monthly_min: 90, monthly_max: 200 },
        offers: &[
            rule(&[LowReviews], "Review Generation + Loyalty Card Automation", 500, 1500, SocialProof,
                "tiene pocas reseñas para destacar entre los cafés de la zona",
                "you have too few reviews to stand out among nearby cafés"),
            rule(&[NoWebsite], "Online Menu + Pickup Ordering Page", 600, 1800, LossAversion,
                "no hay forma de ver el menú ni pedir para recoger",
                "there is no way to see the menu or order for pickup"),
        ],
        default_offer: rule(&[], "WhatsApp Order & Loyalty Bot", 400, 1200, Reciprocity,
            "los clientes frecuentes no tienen ningún incentivo para volver",
            "regulars have no incentive to come back"),
    },
    CategoryProfile {
        category: Category::Spa,
        automations: &[
            "online appointment booking",
            "no-show reminders",
            "rebooking campaigns",
            "post-visit review requests",
        ],
        hooks_es: &[
            "Cada cita que no llega es una hora de terapeuta pagada sin ingreso.",
            "La clienta que no recibe recordatorio no vuelve a agendar.",
        ],
        hooks_en: &[
            "Every no-show is a paid therapist hour with no revenue.",
            "Clients who get no reminder never rebook.",
        ],
        ticket: TicketRange { setup_min: 800, setup_max: 2200, monthly_min: 150, monthly_max: 400 },
        offers: &[
            rule(&[ManualBooking], "AI Appointment Booking + No-Show Reminders", 1500, 4000, LossAversion,
                "las citas se agendan por llamada y no hay recordatorios automáticos",
                "appointments are booked by phone with no automatic reminders"),
            rule(&[SlowResponse], "24/7 WhatsApp Booking Assistant", 1200, 3000, Scarcity,
                "las solicitudes de cita esperan horas para ser confirmadas",
                "appointment requests wait hours to be confirmed"),
            rule(&[LowReviews], "Post-Visit Review Automation", 800, 2000, SocialProof,
                "las clientas satisfechas no dejan reseña",
                "happy clients don't leave reviews"),
        ],
        default_offer: rule(&[], "Client Rebooking Automation", 800, 2000, Reciprocity,
            "no hay seguimiento para que las clientas vuelvan a agendar",
            "there is no follow-up to get clients to rebook"),
    },
    CategoryProfile {
        category: Category::TourOperator,
        automations: &[
            "multilingual WhatsApp sales agent",
            "online checkout with deposits",
            "inquiry follow-up sequences",
            "post-tour review requests",
        ],
        hooks_es: &[
            "El turista compara tres operadores y le compra al primero que contesta.",
            "Las OTAs de tours cobran hasta 25% por venta.",
        ],
        hooks_en: &[
            "Tourists compare three operators and buy from the first one who answers.",
            "Tour OTAs charge up to 25% per sale.",
        ],
        ticket: TicketRange { setup_min: 1200, setup_max: 3500, monthly_min: 250, monthly_max: 700 },
        offers: &[
            rule(&[OtaDependent], "Direct Booking Checkout + OTA Commission Recovery", 2000, 6000, LossAversion,
                "sus tours se venden sobre todo por plataformas con comisión",
                "your tours sell mostly through commission platforms"),
            rule(&[SlowResponse], "Multilingual AI Sales Agent for WhatsApp", 2000, 5000, Scarcity,
                "las consultas de turistas tardan horas en responderse",
                "tourist inquiries take hours to get answered"),
            rule(&[NoWebsite], "Tour Catalog Website + Online Payments", 1500, 4000, LossAversion,
                "no hay un catálogo en línea donde pagar el tour",
                "there is no online catalog to pay for a tour"),
        ],
        default_offer: rule(&[], "Lead Follow-up Automation for Tour Inquiries", 1000, 3000, Reciprocity,
            "las consultas que no compran de inmediato no reciben seguimiento",
            "inquiries that don't buy right away get no follow-up"),
    },
    CategoryProfile {
        category: Category::Nightclub,
        automations: &[
            "VIP table booking bot",
            "guest list automation",
            "event broadcast campaigns",
        ],
        hooks_es: &[
            "Las mesas VIP se venden por DM antes de las 10 p.m.",
            "Una lista de invitados a mano es gente esperando en la puerta.",
        ],
        hooks_en: &[
            "VIP tables sell by DM before 10pm.",
            "A hand-written guest list means people waiting at the door.",
        ],
        ticket: TicketRange { setup_min: 1000, setup_max: 3000, monthly_min: 200, monthly_max: 500 },
        offers: &[
            rule(&[SocialOnly], "VIP Table Booking Bot + Guest List Automation", 2000, 5000, Scarcity,
                "las mesas VIP y la lista de invitados se manejan por DM",
                "VIP tables and the guest list are handled over DM"),
            rule(&[LowReviews], "Reputation Management + Event Review Capture", 1000, 3000, SocialProof,
                "las reseñas no reflejan las noches que organizan",
                "reviews don't reflect the nights you put on"),
        ],
        default_offer: rule(&[], "Event Promotion Broadcast Automation", 1000, 2500, Scarcity,
            "los eventos se anuncian tarde y a mano",
            "events are announced late and by hand"),
    },
    CategoryProfile {
        category: Category::Other,
        automations: &[
            "WhatsApp auto-responder",
            "lead capture website",
            "review requests",
        ],
        hooks_es: &[
            "El cliente que no recibe respuesta le compra a la competencia.",
        ],
        hooks_en: &[
            "A customer who gets no answer buys from the competition.",
        ],
        ticket: TicketRange { setup_min: 500, setup_max: 1500, monthly_min: 100, monthly_max: 300 },
        offers: &[
            rule(&[NoWebsite], "AI-Powered Website + Lead Capture", 800, 2000, LossAversion,
                "no tiene web donde los clientes lo encuentren",
                "there is no website where customers can find you"),
            rule(&[SlowResponse], "24/7 WhatsApp Auto-Responder", 500, 1500, Scarcity,
                "los mensajes tardan horas en responderse",
                "messages take hours to get answered"),
        ],
        default_offer: rule(&[], "AI Customer Service Assistant", 500, 1500, Reciprocity,
            "la atención al cliente se hace toda a mano",
            "customer service is entirely manual"),
    },
];

pub fn profile(category: Category) -> &'static CategoryProfile {
    PROFILES
        .iter()
        .find(|p| p.category == category)
        .unwrap_or(&PROFILES[PROFILES.len() - 1])
}

/// Package sizes offered on every proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: Cow<'static, str>,
    pub automations_included: usize,
    pub description: Cow<'static, str>,
}

const fn tier(name: &'static str, automations_included: usize, description: &'static str) -> PricingTier {
    PricingTier { name: Cow::Borrowed(name), automations_included, description: Cow::Borrowed(description) }
}

pub static PRICING_TIERS: [PricingTier; 3] = [
    tier("Starter", 1, "One automation solving the most urgent gap."),
    tier("Growth", 3, "Booking, reviews and follow-up working together."),
    tier("Black Card", 6, "Full automation stack with a dedicated strategist."),
];

/// Recommend a tier from how many gaps the business shows.
pub fn tier_for_signal_count(count: usize) -> &'static PricingTier {
    match count {
        0 | 1 => &PRICING_TIERS[0],
        2 => &PRICING_TIERS[1],
        _ => &PRICING_TIERS[2],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionKind {
    Price,
    AlreadyHave,
    Timing,
    SendInfo,
    Trust,
    NotInterested,
    Generic,
}

#[derive(Debug, Serialize)]
pub struct ObjectionScript {
    pub kind: ObjectionKind,
    /// Lower-case words or phrases that identify the objection in a prospect
    /// reply. Matched against whole words only.
    pub keywords: &'static [&'static str],
    pub response_es: &'static str,
    pub response_en: &'static str,
}

impl ObjectionScript {
    pub fn response(&self, language: Language) -> &'static str {
        match language {
            Language::Es => self.response_es,
            Language::En => self.response_en,
        }
    }
}

/// Checked in order; the first script with a matching keyword wins. An
/// explicit rejection outranks whatever reason follows it.
pub static OBJECTIONS: [ObjectionScript; 6] = [
    ObjectionScript {
        kind: ObjectionKind::NotInterested,
        keywords: &["no me interesa", "no nos interesa", "no gracias", "no, gracias", "not interested", "no thanks", "no thank you"],
        response_es: "Entendido, {business_name}, gracias por responder. Si en algún momento quiere ver cuánto se está perdiendo por {pain_point}, aquí estaré.",
        response_en: "Understood, {business_name}, thanks for replying. If you ever want to see what {pain_point} is costing you, I'm here.",
    },
    ObjectionScript {
        kind: ObjectionKind::Price,
        keywords: &["caro", "precio", "costoso", "presupuesto", "plata", "expensive", "price", "cost", "budget"],
        response_es: "Entiendo, {business_name}. Por eso lo medimos contra lo que ya se está perdiendo: entre {loss_min} y {loss_max} al mes. Si en 60 días el {offer} no recupera al menos su costo, le devolvemos la mensualidad.",
        response_en: "Understood, {business_name}. That's why we measure it against what is already being lost: {loss_min} to {loss_max} a month. If the {offer} doesn't pay for itself in 60 days, we refund the monthly fee.",
    },
    ObjectionScript {
        kind: ObjectionKind::AlreadyHave,
        keywords: &["ya tenemos", "ya tengo", "ya usamos", "ya contamos", "already", "we have", "we use"],
        response_es: "¡Qué bien que ya tengan algo! Muchos de nuestros clientes en {city} también lo tenían. Lo que hacemos es conectarlo con WhatsApp para que no se pierda ninguna consulta. ¿Le muestro la diferencia en 10 minutos?",
        response_en: "Great that you already have something! Many of our clients in {city} did too. We connect it to WhatsApp so no inquiry slips through. Can I show you the difference in 10 minutes?",
    },
    ObjectionScript {
        kind: ObjectionKind::Timing,
        keywords: &["tiempo", "ocupado", "ocupada", "después", "luego", "más adelante", "temporada", "busy", "later", "next month", "time"],
        response_es: "Totalmente entendible. La implementación la hacemos nosotros y a su equipo le toma menos de una hora. ¿Le parece si agendamos 15 minutos la próxima semana?",
        response_en: "Totally understandable. We do the setup and it takes your team less than an hour. How about 15 minutes next week?",
    },
    ObjectionScript {
        kind: ObjectionKind::SendInfo,
        keywords: &["información", "informacion", "info", "envíe", "envie", "mande", "correo", "send", "brochure", "email me"],
        response_es: "Con gusto. Para enviarle algo útil y no un folleto genérico, ¿me confirma cuántas reservas o pedidos reciben por semana? Así le mando el cálculo para su {category}.",
        response_en: "Happy to. So I send something useful instead of a generic brochure, how many bookings or orders do you get per week? I'll send the numbers for your {category}.",
    },
    ObjectionScript {
        kind: ObjectionKind::Trust,
        keywords: &["estafa", "confianza", "garantía", "garantia", "referencias", "scam", "trust", "guarantee", "references"],
        response_es: "Es normal desconfiar. Le comparto el contacto de dos negocios de {city} que ya trabajan con {sender_company}, y el primer mes va con garantía de devolución.",
        response_en: "It's normal to be cautious. I can share two businesses in {city} already working with {sender_company}, and the first month comes with a money-back guarantee.",
    },
];

pub static GENERIC_OBJECTION: ObjectionScript = ObjectionScript {
    kind: ObjectionKind::Generic,
    keywords: &[],
    response_es: "Gracias por su respuesta, {business_name}. ¿Qué sería lo más importante para usted antes de dar el siguiente paso?",
    response_en: "Thanks for your reply, {business_name}. What would matter most to you before taking the next step?",
};

/// Find the script for a prospect reply. Unrecognized text gets the generic script.
pub fn classify_objection(text: &str) -> &'static ObjectionScript {
    let tokens = words(text);
    OBJECTIONS
        .iter()
        .find(|script| script.keywords.iter().any(|kw| contains_phrase(&tokens, &words(kw))))
        .unwrap_or(&GENERIC_OBJECTION)
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|w| w == phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_profile() {
        for cat in Category::ALL {
            assert_eq!(profile(cat).category, cat);
        }
    }

    #[test]
    fn test_default_offers_have_no_requirements() {
        for p in PROFILES.iter() {
            assert!(p.default_offer.requires.is_empty());
            assert!(!p.offers.is_empty());
            assert!(!p.hooks_es.is_empty() && p.hooks_es.len() == p.hooks_en.len());
        }
    }

    #[test]
    fn test_loss_ranges_are_ordered() {
        for p in PROFILES.iter() {
            for r in p.offers.iter().chain(std::iter::once(&p.default_offer)) {
                assert!(r.loss.min <= r.loss.max, "{} has inverted range", r.offer);
            }
        }
    }

    #[test]
    fn test_restaurant_first_rule() {
        let first = &profile(Category::Restaurant).offers[0];
        assert_eq!(first.requires, &[NoWebsite, LowReviews]);
        assert_eq!(first.offer, "AI Booking Bot + Review Management System");
        assert_eq!(first.loss, LossRange::new(2000, 5000));
    }

    #[test]
    fn test_classify_objection_by_keyword() {
        assert_eq!(classify_objection("Está muy caro para nosotros").kind, ObjectionKind::Price);
        assert_eq!(classify_objection("Ya tenemos un sistema de reservas").kind, ObjectionKind::AlreadyHave);
        assert_eq!(classify_objection("Mándeme la información al correo").kind, ObjectionKind::SendInfo);
        assert_eq!(classify_objection("No gracias").kind, ObjectionKind::NotInterested);
        assert_eq!(classify_objection("We're busy until December").kind, ObjectionKind::Timing);
    }

    #[test]
    fn test_classify_objection_matches_whole_words_only() {
        assert_eq!(classify_objection("Ya tenemos una plataforma de reservas").kind, ObjectionKind::AlreadyHave);
        assert_eq!(classify_objection("Estamos en la Costa, gracias").kind, ObjectionKind::Generic);
        assert_eq!(classify_objection("No me interesa por ahora, sometimes later").kind, ObjectionKind::NotInterested);
        assert_eq!(classify_objection("¿Cuánto cuesta? ¿Cuál es el precio?").kind, ObjectionKind::Price);
        assert_eq!(classify_objection("No, gracias").kind, ObjectionKind::NotInterested);
    }

    #[test]
    fn test_classify_objection_unknown_is_generic() {
        assert_eq!(classify_objection("¿Quién es usted?").kind, ObjectionKind::Generic);
    }

    #[test]
    fn test_tier_for_signal_count() {
        assert_eq!(tier_for_signal_count(0).name, "Starter");
        assert_eq!(tier_for_signal_count(2).name, "Growth");
        assert_eq!(tier_for_signal_count(5).name, "Black Card");
    }
}
