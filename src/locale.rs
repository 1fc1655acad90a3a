//! Locales supported by the chat widget.
//!
//! String tables mirror the storefront deployment: six languages, with
//! Arabic rendered right-to-left.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
    Fr,
    Es,
    De,
    Tr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// The fixed UI strings for one locale
#[derive(Debug, Clone, Copy)]
pub struct Strings {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub welcome: &'static str,
    pub send_button: &'static str,
    pub error_message: &'static str,
    pub loading: &'static str,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Fr => "fr",
            Locale::Es => "es",
            Locale::De => "de",
            Locale::Tr => "tr",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            "fr" => Some(Locale::Fr),
            "es" => Some(Locale::Es),
            "de" => Some(Locale::De),
            "tr" => Some(Locale::Tr),
            _ => None,
        }
    }

    pub fn all() -> Vec<Locale> {
        vec![
            Locale::En,
            Locale::Ar,
            Locale::Fr,
            Locale::Es,
            Locale::De,
            Locale::Tr,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ar => "العربية",
            Locale::Fr => "Français",
            Locale::Es => "Español",
            Locale::De => "Deutsch",
            Locale::Tr => "Türkçe",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Locale::Ar => Direction::RightToLeft,
            _ => Direction::LeftToRight,
        }
    }

    pub fn strings(&self) -> Strings {
        match self {
            Locale::En => Strings {
                title: "Souqcoom Support",
                placeholder: "Type your message here...",
                welcome: "Hello! 👋 How can I help you today?",
                send_button: "Send message",
                error_message: "Sorry, something went wrong. Please try again.",
                loading: "Thinking",
            },
            Locale::Ar => Strings {
                title: "المساعد الذكي لسوق.كوم",
                placeholder: "كيف يمكنني مساعدتك اليوم؟",
                welcome: "مرحباً! 👋 أنا المساعد الافتراضي الذكي لسوق.كوم، كيف يمكنني خدمتك اليوم؟",
                send_button: "إرسال",
                error_message: "عذراً، حدث خطأ في النظام. يُرجى المحاولة مرة أخرى.",
                loading: "جارٍ التحليل",
            },
            Locale::Fr => Strings {
                title: "Support Souqcoom",
                placeholder: "Tapez votre message ici...",
                welcome: "Bonjour! 👋 Comment puis-je vous aider aujourd'hui?",
                send_button: "Envoyer le message",
                error_message: "Désolé, une erreur s'est produite. Veuillez réessayer.",
                loading: "En train de réfléchir",
            },
            Locale::Es => Strings {
                title: "Soporte de Souqcoom",
                placeholder: "Escribe tu mensaje aquí...",
                welcome: "¡Hola! 👋 ¿Cómo puedo ayudarte hoy?",
                send_button: "Enviar mensaje",
                error_message: "Lo siento, algo salió mal. Por favor, inténtalo de nuevo.",
                loading: "Pensando",
            },
            Locale::De => Strings {
                title: "Souqcoom Support",
                placeholder: "Geben Sie Ihre Nachricht hier ein...",
                welcome: "Hallo! 👋 Wie kann ich Ihnen heute helfen?",
                send_button: "Nachricht senden",
                error_message: "Entschuldigung, etwas ist schief gelaufen. Bitte versuchen Sie es erneut.",
                loading: "Denken",
            },
            Locale::Tr => Strings {
                title: "Souqcoom Destek",
                placeholder: "Mesajınızı buraya yazın...",
                welcome: "Merhaba! 👋 Bugün size nasıl yardımcı olabilirim?",
                send_button: "Mesaj gönder",
                error_message: "Üzgünüz, bir şeyler ters gitti. Lütfen tekrar deneyin.",
                loading: "Düşünüyor",
            },
        }
    }
}
