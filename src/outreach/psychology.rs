use serde::{Deserialize, Serialize};

/// Persuasion angle used to phrase a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    LossAversion,
    SocialProof,
    Reciprocity,
    Scarcity,
}

impl Framework {
    pub const ALL: [Framework; 4] = [
        Framework::LossAversion,
        Framework::SocialProof,
        Framework::Reciprocity,
        Framework::Scarcity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LossAversion => "loss_aversion",
            Self::SocialProof => "social_proof",
            Self::Reciprocity => "reciprocity",
            Self::Scarcity => "scarcity",
        }
    }

    /// Accepts framework names and the tone aliases the dashboard sends.
    pub fn from_tone(tone: &str) -> Option<Self> {
        match tone.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "loss_aversion" | "loss" | "direct" => Some(Self::LossAversion),
            "social_proof" | "proof" | "testimonial" => Some(Self::SocialProof),
            "reciprocity" | "friendly" | "value" | "consultative" => Some(Self::Reciprocity),
            "scarcity" | "urgent" | "urgency" | "fomo" => Some(Self::Scarcity),
            _ => None,
        }
    }

    pub fn copy(&self) -> &'static FrameworkCopy {
        match self {
            Self::LossAversion => &FRAMEWORKS[0],
            Self::SocialProof => &FRAMEWORKS[1],
            Self::Reciprocity => &FRAMEWORKS[2],
            Self::Scarcity => &FRAMEWORKS[3],
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::LossAversion => 0,
            Self::SocialProof => 1,
            Self::Reciprocity => 2,
            Self::Scarcity => 3,
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spa" | "spanish" | "español" | "espanol" => Some(Self::Es),
            "en" | "eng" | "english" | "inglés" | "ingles" => Some(Self::En),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

/// Literal templates for every channel in one language.
#[derive(Debug, Serialize)]
pub struct ChannelTemplates {
    pub whatsapp: &'static str,
    pub instagram: &'static str,
    pub email_subject: &'static str,
    pub email_body: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FrameworkCopy {
    pub framework: Framework,
    pub name: &'static str,
    pub description: &'static str,
    pub es: ChannelTemplates,
    pub en: ChannelTemplates,
}

impl FrameworkCopy {
    pub fn templates(&self, language: Language) -> &ChannelTemplates {
        match language {
            Language::Es => &self.es,
            Language::En => &self.en,
        }
    }
}

pub static FRAMEWORKS: [FrameworkCopy; 4] = [
    FrameworkCopy {
        framework: Framework::LossAversion,
        name: "Loss aversion",
        description: "Frames the offer around money already leaving the business every month.",
        es: ChannelTemplates {
            whatsapp: "Hola {business_name}, soy {sender_name} de {sender_company}. Revisando negocios en {city} noté algo sobre su {category}: {pain_point}. Eso le puede estar costando entre {loss_min} y {loss_max} al mes. Con un {offer} se corrige en menos de dos semanas. ¿Le muestro cómo en 10 minutos?",
            instagram: "Hola {business_name} 👋 Vimos su perfil y detectamos que {pain_point}. Son entre {loss_min} y {loss_max} al mes que se escapan. ¿Le mostramos cómo lo frena un {offer}?",
            email_subject: "{business_name}: hasta {loss_max} al mes que se están perdiendo",
            email_body: "Hola equipo de {business_name},\n\nSoy {sender_name} de {sender_company}. Analizamos la presencia digital de los negocios de {city} y en su {category} encontramos lo siguiente: {pain_point}.\n\nPara un negocio como el suyo esto representa entre {loss_min} y {loss_max} al mes en ventas que no se concretan.\n\nNuestra propuesta: {offer}. {hook}\n\n¿Tiene 15 minutos esta semana para mostrarle los números?\n\nSaludos,\n{sender_name}\n{sender_company}",
        },
        en: ChannelTemplates {
            whatsapp: "Hi {business_name}, this is {sender_name} from {sender_company}. While reviewing businesses in {city} I noticed something about your {category}: {pain_point}. That can cost you between {loss_min} and {loss_max} a month. An {offer} fixes it in under two weeks. Can I show you how in 10 minutes?",
            instagram: "Hi {business_name} 👋 We checked your profile and noticed {pain_point}. That is {loss_min} to {loss_max} a month slipping away. Want to see how an {offer} stops it?",
            email_subject: "{business_name}: up to {loss_max} a month slipping away",
            email_body: "Hi {business_name} team,\n\nI'm {sender_name} from {sender_company}. We reviewed the online presence of businesses in {city} and found this about your {category}: {pain_point}.\n\nFor a business like yours that means {loss_min} to {loss_max} a month in sales that never close.\n\nOur proposal: {offer}. {hook}\n\nDo you have 15 minutes this week to go over the numbers?\n\nBest,\n{sender_name}\n{sender_company}",
        },
    },
    FrameworkCopy {
        framework: Framework::SocialProof,
        name: "Social proof",
        description: "Shows that similar businesses in the same city already solved the problem.",
        es: ChannelTemplates {
            whatsapp: "Hola {business_name}, soy {sender_name} de {sender_company}. Estamos trabajando con otros negocios de {city} que tenían el mismo reto: {pain_point}. Con un {offer} recuperaron buena parte de los {loss_min} a {loss_max} mensuales que se les escapaban. {hook} ¿Le cuento cómo lo hicieron?",
            instagram: "Hola {business_name}! Varios negocios de {city} ya usan un {offer} para resolver esto: {pain_point}. ¿Le cuento qué resultados están viendo?",
            email_subject: "Cómo otros negocios de {city} resolvieron esto",
            email_body: "Hola equipo de {business_name},\n\nSoy {sender_name} de {sender_company}. En los últimos meses ayudamos a varios negocios de {city} con un problema que también vemos en su {category}: {pain_point}.\n\nDespués de implementar un {offer}, dejaron de perder entre {loss_min} y {loss_max} al mes. {hook}\n\n¿Le gustaría ver el caso de uno de ellos?\n\nSaludos,\n{sender_name}\n{sender_company}",
        },
        en: ChannelTemplates {
            whatsapp: "Hi {business_name}, {sender_name} from {sender_company} here. We work with other businesses in {city} that had the same challenge: {pain_point}. With an {offer} they recovered most of the {loss_min} to {loss_max} a month they were losing. {hook} Want to hear how they did it?",
            instagram: "Hi {business_name}! Several businesses in {city} already use an {offer} to solve this: {pain_point}. Want to see their results?",
            email_subject: "How other businesses in {city} solved this",
            email_body: "Hi {business_name} team,\n\nI'm {sender_name} from {sender_company}. Over the last few months we helped several businesses in {city} with a problem we also see at your {category}: {pain_point}.\n\nAfter rolling out an {offer}, they stopped losing {loss_min} to {loss_max} a month. {hook}\n\nWould you like to see one of their case studies?\n\nBest,\n{sender_name}\n{sender_company}",
        },
    },
    FrameworkCopy {
        framework: Framework::Reciprocity,
        name: "Reciprocity",
        description: "Opens with a free diagnostic so the prospect receives value before any ask.",
        es: ChannelTemplates {
            whatsapp: "Hola {business_name}, soy {sender_name} de {sender_company}. Preparé un diagnóstico gratuito de su {category} en {city}. Lo más importante: {pain_point}. Se lo comparto sin compromiso junto con una demo de {offer}. ¿Se lo envío por aquí?",
            instagram: "Hola {business_name}! Preparamos un diagnóstico gratis de su {category}. Spoiler: {pain_point}. ¿Se lo enviamos por DM?",
            email_subject: "Diagnóstico gratuito para {business_name}",
            email_body: "Hola equipo de {business_name},\n\nSoy {sender_name} de {sender_company}. Sin ningún compromiso, preparamos un diagnóstico de su {category} en {city}.\n\nHallazgo principal: {pain_point}. Estimamos un impacto de {loss_min} a {loss_max} al mes.\n\nIncluimos una demo de cómo un {offer} lo resolvería. {hook}\n\nSi le sirve, respóndame y se lo envío completo.\n\nSaludos,\n{sender_name}\n{sender_company}",
        },
        en: ChannelTemplates {
            whatsapp: "Hi {business_name}, I'm {sender_name} from {sender_company}. I put together a free diagnostic for your {category} in {city}. The main finding: {pain_point}. Happy to share it, no strings attached, with a demo of an {offer}. Shall I send it here?",
            instagram: "Hi {business_name}! We prepared a free diagnostic of your {category}. Spoiler: {pain_point}. Want it by DM?",
            email_subject: "Free diagnostic for {business_name}",
            email_body: "Hi {business_name} team,\n\nI'm {sender_name} from {sender_company}. No strings attached, we prepared a diagnostic of your {category} in {city}.\n\nMain finding: {pain_point}. We estimate an impact of {loss_min} to {loss_max} a month.\n\nWe included a demo of how an {offer} would solve it. {hook}\n\nIf it helps, just reply and I'll send the full report.\n\nBest,\n{sender_name}\n{sender_company}",
        },
    },
    FrameworkCopy {
        framework: Framework::Scarcity,
        name: "Scarcity",
        description: "Limits availability to create a reason to answer now.",
        es: ChannelTemplates {
            whatsapp: "Hola {business_name}, soy {sender_name} de {sender_company}. Este mes solo abrimos 3 cupos en {city} para implementar un {offer}. Vimos que {pain_point}, y eso le puede costar entre {loss_min} y {loss_max} al mes. ¿Le reservo uno de los cupos?",
            instagram: "Hola {business_name}! Quedan pocos cupos este mes en {city} para un {offer}. ¿Le guardamos uno?",
            email_subject: "Quedan 3 cupos en {city} este mes",
            email_body: "Hola equipo de {business_name},\n\nSoy {sender_name} de {sender_company}. Este mes solo podemos atender tres negocios nuevos en {city}.\n\nQuisiéramos que su {category} fuera uno de ellos porque vimos que {pain_point}, algo que suele costar entre {loss_min} y {loss_max} al mes.\n\nLa solución es un {offer}. {hook}\n\n¿Le reservo un cupo antes del viernes?\n\nSaludos,\n{sender_name}\n{sender_company}",
        },
        en: ChannelTemplates {
            whatsapp: "Hi {business_name}, this is {sender_name} from {sender_company}. This month we're only opening 3 spots in {city} to set up an {offer}. We saw that {pain_point}, which can cost you {loss_min} to {loss_max} a month. Should I hold one of the spots for you?",
            instagram: "Hi {business_name}! Only a few spots left this month in {city} for an {offer}. Want us to save you one?",
            email_subject: "3 spots left in {city} this month",
            email_body: "Hi {business_name} team,\n\nI'm {sender_name} from {sender_company}. This month we can only take on three new businesses in {city}.\n\nWe'd like your {category} to be one of them because we saw that {pain_point}, which usually costs {loss_min} to {loss_max} a month.\n\nThe fix is an {offer}. {hook}\n\nShall I reserve a spot for you before Friday?\n\nBest,\n{sender_name}\n{sender_company}",
        },
    },
];

/// Day 3, 7 and 14 follow-ups, shared by every framework.
pub static FOLLOW_UPS_ES: [&str; 3] = [
    "Hola {business_name}, le escribo de nuevo por lo del {offer}. ¿Alcanzó a ver mi mensaje anterior?",
    "{business_name}, otros negocios de {city} ya están usando {automation}. Sigo teniendo su diagnóstico listo por si le interesa.",
    "Último mensaje, {business_name}: cierro su diagnóstico esta semana. Si más adelante quiere recuperar esos {loss_min} a {loss_max} mensuales, aquí estaré. Saludos, {sender_name}.",
];

pub static FOLLOW_UPS_EN: [&str; 3] = [
    "Hi {business_name}, following up on the {offer}. Did you get a chance to see my last message?",
    "{business_name}, other businesses in {city} are already using {automation}. Your diagnostic is still ready if you're interested.",
    "Last message, {business_name}: I'm closing your diagnostic this week. If you ever want to recover that {loss_min} to {loss_max} a month, I'm here. Best, {sender_name}.",
];

pub fn follow_ups(language: Language) -> &'static [&'static str; 3] {
    match language {
        Language::Es => &FOLLOW_UPS_ES,
        Language::En => &FOLLOW_UPS_EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_table_is_indexed_by_variant() {
        for fw in Framework::ALL {
            assert_eq!(fw.copy().framework, fw);
            assert_eq!(FRAMEWORKS[fw.index()].framework, fw);
        }
    }

    #[test]
    fn test_tone_aliases() {
        assert_eq!(Framework::from_tone("urgent"), Some(Framework::Scarcity));
        assert_eq!(Framework::from_tone("Social Proof"), Some(Framework::SocialProof));
        assert_eq!(Framework::from_tone("friendly"), Some(Framework::Reciprocity));
        assert_eq!(Framework::from_tone("loss-aversion"), Some(Framework::LossAversion));
        assert_eq!(Framework::from_tone("sarcastic"), None);
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("ES"), Some(Language::Es));
        assert_eq!(Language::parse("english"), Some(Language::En));
        assert_eq!(Language::parse("pt"), None);
        assert_eq!(Language::default(), Language::Es);
    }

    #[test]
    fn test_every_template_mentions_the_business() {
        for copy in FRAMEWORKS.iter() {
            for lang in [Language::Es, Language::En] {
                let t = copy.templates(lang);
                assert!(t.whatsapp.contains("{business_name}"));
                assert!(t.email_body.contains("{offer}"));
            }
        }
    }
}
