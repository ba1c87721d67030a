use serde::{Deserialize, Serialize};
use crate::models::{Business, FollowUps};
use crate::utils::formatting::format_usd;
use super::offers::MatchedOffer;
use super::psychology::{follow_ups, Framework, Language};
use super::tables;

/// Who signs the messages. Comes from the settings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub name: String,
    pub company: String,
}

impl Default for Sender {
    fn default() -> Self {
        Self {
            name: "Equipo MachineMind".to_string(),
            company: "MachineMind".to_string(),
        }
    }
}

pub struct RenderInput<'a> {
    pub business: &'a Business,
    pub offer: &'a MatchedOffer,
    pub framework: Framework,
    pub language: Language,
    pub sender: &'a Sender,
}

/// The full message set for one business, one framework, one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachMessages {
    pub framework: Framework,
    pub language: Language,
    pub whatsapp_script: String,
    pub whatsapp_link: String,
    pub instagram_dm: String,
    pub email_subject: String,
    pub email_body: String,
    pub follow_ups: FollowUps,
}

/// Substitute `{key}` placeholders. Unknown keys are left as written so a
/// typo in a template is visible in the output rather than silently dropped.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Normalize a phone number for wa.me: digits only, and Colombian 10-digit
/// mobiles (starting with 3) get the 57 country code.
pub fn whatsapp_digits(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 && digits.starts_with('3') {
        format!("57{}", digits)
    } else {
        digits
    }
}

/// `https://wa.me/<number>?text=<message>`; without a number the link opens
/// WhatsApp's contact picker with the message prefilled.
pub fn whatsapp_link(number: Option<&str>, text: &str) -> String {
    let digits = number.map(whatsapp_digits).unwrap_or_default();
    let base = format!("https://wa.me/{}", digits);
    match reqwest::Url::parse_with_params(&base, &[("text", text)]) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

/// Render every channel for one business. Pure: the same input always
/// produces byte-identical output.
pub fn render(input: &RenderInput<'_>) -> OutreachMessages {
    let business = input.business;
    let language = input.language;
    let category = business.category_kind();
    let profile = tables::profile(category);

    let hooks = profile.hooks(language);
    let hook = hooks.get(input.framework.index() % hooks.len().max(1)).copied().unwrap_or("");
    let automation = profile.automations.first().copied().unwrap_or("");
    let category_label = match language {
        Language::Es => category.label_es(),
        Language::En => category.label_en(),
    };
    let loss_min = format_usd(input.offer.loss.min, language);
    let loss_max = format_usd(input.offer.loss.max, language);

    let vars: [(&str, &str); 11] = [
        ("business_name", business.name.as_str()),
        ("city", business.city.as_str()),
        ("category", category_label),
        ("offer", input.offer.offer.as_str()),
        ("loss_min", loss_min.as_str()),
        ("loss_max", loss_max.as_str()),
        ("pain_point", input.offer.pain_point(language)),
        ("automation", automation),
        ("hook", hook),
        ("sender_name", input.sender.name.as_str()),
        ("sender_company", input.sender.company.as_str()),
    ];

    let templates = input.framework.copy().templates(language);
    let whatsapp_script = fill(templates.whatsapp, &vars);
    let whatsapp_link = whatsapp_link(business.whatsapp_number(), &whatsapp_script);
    let [day3, day7, day14] = follow_ups(language);

    OutreachMessages {
        framework: input.framework,
        language,
        whatsapp_link,
        instagram_dm: fill(templates.instagram, &vars),
        email_subject: fill(templates.email_subject, &vars),
        email_body: fill(templates.email_body, &vars),
        follow_ups: FollowUps {
            day3: fill(day3, &vars),
            day7: fill(day7, &vars),
            day14: fill(day14, &vars),
        },
        whatsapp_script,
    }
}
