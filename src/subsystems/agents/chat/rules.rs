//! Intercept rules — canned replies checked before the hosted model.
//!
//! The input is lower-cased and split into words on anything that is not a
//! letter or digit, then tested against [`RULES`] in order. The first rule
//! that matches wins; no match means the message goes to the model. A rule
//! fires when one of its `contains` phrases appears as a run of whole words,
//! or when the message consists of exactly one of its `whole` phrases.
//! Matching on words keeps `infeliz` away from `feliz` and `cansado` away
//! from `sad`.

use std::fmt;

use crate::subsystems::persona::Persona;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Sad,
    Happy,
    Tired,
    Anxious,
    Angry,
}

/// Which path produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Greeting,
    Affirm,
    Deny,
    Emotion(Emotion),
    /// No rule matched; the hosted model answered (or failed to).
    Model,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Route::Greeting => "greeting",
            Route::Affirm => "affirm",
            Route::Deny => "deny",
            Route::Emotion(Emotion::Sad) => "emotion:sad",
            Route::Emotion(Emotion::Happy) => "emotion:happy",
            Route::Emotion(Emotion::Tired) => "emotion:tired",
            Route::Emotion(Emotion::Anxious) => "emotion:anxious",
            Route::Emotion(Emotion::Angry) => "emotion:angry",
            Route::Model => "model",
        };
        f.write_str(s)
    }
}

struct Rule {
    route: Route,
    contains: &'static [&'static str],
    whole: &'static [&'static str],
}

impl Rule {
    fn matches(&self, words: &[&str]) -> bool {
        self.contains.iter().any(|phrase| contains_phrase(words, phrase))
            || self.whole.iter().any(|phrase| phrase.split(' ').eq(words.iter().copied()))
    }
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Evaluation order is significant.
const RULES: &[Rule] = &[
    Rule {
        route: Route::Greeting,
        contains: &["olá", "ola nova", "oi nova", "bom dia", "boa tarde", "boa noite", "hello"],
        whole: &["oi", "ola", "olá", "hey"],
    },
    Rule {
        route: Route::Affirm,
        contains: &[],
        whole: &["sim", "s", "claro", "pode", "yes", "isso"],
    },
    Rule {
        route: Route::Deny,
        contains: &[],
        whole: &["não", "nao", "n", "no", "nem"],
    },
    Rule {
        route: Route::Emotion(Emotion::Sad),
        contains: &["triste", "chateado", "chateada", "infeliz", "desanimado", "desanimada", "sad"],
        whole: &[],
    },
    Rule {
        route: Route::Emotion(Emotion::Happy),
        contains: &["feliz", "animado", "animada", "happy"],
        whole: &[],
    },
    Rule {
        route: Route::Emotion(Emotion::Tired),
        contains: &["cansado", "cansada", "exausto"],
        whole: &[],
    },
    Rule {
        route: Route::Emotion(Emotion::Anxious),
        contains: &["ansioso", "ansiosa", "preocupado", "preocupada"],
        whole: &[],
    },
    Rule {
        route: Route::Emotion(Emotion::Angry),
        contains: &["bravo", "brava", "irritado", "irritada"],
        whole: &[],
    },
];

/// First rule matching `input`, or `None` when the model should answer.
pub fn route(input: &str) -> Option<Route> {
    let normalized = input.to_lowercase();
    let words = words(&normalized);
    if words.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| rule.matches(&words))
        .map(|rule| rule.route)
}

/// Canned reply for a rule route. `None` for [`Route::Model`].
pub fn render(route: Route, persona: &Persona) -> Option<String> {
    let name = persona.name();
    let user = persona.operator();
    let text = match route {
        Route::Greeting => format!("Oi, {user}! Aqui é a {name}. Como posso te ajudar hoje?"),
        Route::Affirm => format!("Perfeito, {user}! Então me conta mais, estou ouvindo."),
        Route::Deny => format!("Tudo bem, {user}. Se mudar de ideia, a {name} está aqui."),
        Route::Emotion(Emotion::Sad) => format!(
            "Poxa, {user}, sinto muito que você esteja assim. Quer conversar sobre o que aconteceu? A {name} está aqui com você. 💙"
        ),
        Route::Emotion(Emotion::Happy) => {
            format!("Que alegria, {user}! Fico feliz demais em ver você assim. O que aconteceu de bom?")
        }
        Route::Emotion(Emotion::Tired) => {
            format!("Você merece um descanso, {user}. Que tal uma pausa? A {name} fica aqui esperando.")
        }
        Route::Emotion(Emotion::Anxious) => {
            format!("Respira fundo comigo, {user}. Um passo de cada vez, vamos organizar isso juntos.")
        }
        Route::Emotion(Emotion::Angry) => {
            format!("Entendo a frustração, {user}. Quer desabafar? Estou ouvindo sem julgamentos.")
        }
        Route::Model => return None,
    };
    Some(text)
}

/// Route and render in one step.
pub fn intercept(input: &str, persona: &Persona) -> Option<(Route, String)> {
    let route = route(input)?;
    render(route, persona).map(|text| (route, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn persona() -> Persona {
        Persona::from_value(json!({ "nome": "Nova", "config": { "usuario": "Kley" } })).unwrap()
    }

    #[test]
    fn greetings() {
        assert_eq!(route("Oi"), Some(Route::Greeting));
        assert_eq!(route("  Bom dia, Nova!  "), Some(Route::Greeting));
        assert_eq!(route("OLÁ, tudo bem?"), Some(Route::Greeting));
        assert_eq!(route("hey!"), Some(Route::Greeting));
    }

    #[test]
    fn yes_no_only_as_whole_message() {
        assert_eq!(route("Sim!"), Some(Route::Affirm));
        assert_eq!(route("claro..."), Some(Route::Affirm));
        assert_eq!(route("Não"), Some(Route::Deny));
        assert_eq!(route("nao."), Some(Route::Deny));
        // "assim" contains "sim" but is not a yes
        assert_eq!(route("é assim que funciona a fotossíntese?"), None);
        assert_eq!(route("não sei o que fazer com meu código"), None);
    }

    #[test]
    fn emotions() {
        assert_eq!(route("estou muito triste hoje"), Some(Route::Emotion(Emotion::Sad)));
        assert_eq!(route("Tô feliz!"), Some(Route::Emotion(Emotion::Happy)));
        assert_eq!(route("que dia, estou exausto"), Some(Route::Emotion(Emotion::Tired)));
        assert_eq!(route("ando ansiosa com a prova"), Some(Route::Emotion(Emotion::Anxious)));
        assert_eq!(route("fiquei irritado com isso"), Some(Route::Emotion(Emotion::Angry)));
    }

    #[test]
    fn first_match_wins() {
        // greeting precedes every emotion
        assert_eq!(route("bom dia, estou triste"), Some(Route::Greeting));
        // sad precedes happy
        assert_eq!(route("estou feliz mas triste"), Some(Route::Emotion(Emotion::Sad)));
        // tired precedes anxious
        assert_eq!(route("cansada e preocupada"), Some(Route::Emotion(Emotion::Tired)));
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(route("estou cansado"), Some(Route::Emotion(Emotion::Tired)));
        assert_eq!(route("Cansada, muito cansada."), Some(Route::Emotion(Emotion::Tired)));
        assert_eq!(route("estou infeliz"), Some(Route::Emotion(Emotion::Sad)));
        assert_eq!(route("estou desanimado com o trabalho"), Some(Route::Emotion(Emotion::Sad)));
        assert_eq!(route("I feel sad"), Some(Route::Emotion(Emotion::Sad)));
        assert_eq!(route("no passado eu usava Python, me explica Rust?"), None);
        assert_eq!(route("o código está pesado e usado demais"), None);
        assert_eq!(route("fui na escola nova hoje, o que acha?"), None);
        assert_eq!(route("oi, nova"), Some(Route::Greeting));
        assert_eq!(route("Oi Nova, tudo certo?"), Some(Route::Greeting));
    }

    #[test]
    fn tired_and_happy_replies_use_their_own_templates() {
        let p = persona();
        let (r, text) = intercept("estou cansado", &p).unwrap();
        assert_eq!(r, Route::Emotion(Emotion::Tired));
        assert!(text.starts_with("Você merece um descanso, Kley."));
        assert!(text.contains("Nova"));

        let (r, text) = intercept("estou feliz", &p).unwrap();
        assert_eq!(r, Route::Emotion(Emotion::Happy));
        assert!(text.starts_with("Que alegria, Kley!"));
    }

    #[test]
    fn unmatched_goes_to_model() {
        assert_eq!(route("me explica o que é Rust"), None);
        assert_eq!(route(""), None);
        assert_eq!(route("?!  ..."), None);
        assert!(intercept("qual a capital da França?", &persona()).is_none());
    }

    #[test]
    fn persona_fields_in_replies() {
        let p = persona();
        let (r, text) = intercept("oi", &p).unwrap();
        assert_eq!(r, Route::Greeting);
        assert!(text.contains("Kley"));
        assert!(text.contains("Nova"));

        for input in ["sim", "não", "triste", "feliz", "cansado", "ansioso", "bravo"] {
            let (_, text) = intercept(input, &p).unwrap();
            assert!(text.contains("Kley"), "reply to {input:?} lacks operator name: {text}");
        }
    }

    #[test]
    fn model_route_has_no_template() {
        assert!(render(Route::Model, &persona()).is_none());
    }

    #[test]
    fn route_names() {
        assert_eq!(Route::Emotion(Emotion::Anxious).to_string(), "emotion:anxious");
        assert_eq!(Route::Model.to_string(), "model");
    }
}
