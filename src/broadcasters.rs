//! Where to watch: a static country → competition-category table.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompetitionCategory {
    PremierLeague,
    European,
    DomesticCup,
}

impl CompetitionCategory {
    /// Classify a competition name as reported by either provider.
    pub fn classify(competition: &str) -> Self {
        let c = competition.to_lowercase();
        if ["champions", "europa", "conference", "uefa"]
            .iter()
            .any(|k| c.contains(k))
        {
            CompetitionCategory::European
        } else if ["fa cup", "league cup", "efl", "carabao"]
            .iter()
            .any(|k| c.contains(k))
        {
            CompetitionCategory::DomesticCup
        } else {
            CompetitionCategory::PremierLeague
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Broadcaster {
    pub name: &'static str,
    pub url: &'static str,
}

/// Shown when nothing in the table applies.
pub const DEFAULT_BROADCASTER: Broadcaster = Broadcaster {
    name: "Check local listings",
    url: "",
};

type CountryRow = (&'static str, &'static [(CompetitionCategory, Broadcaster)]);

use CompetitionCategory::{DomesticCup, European, PremierLeague};

const fn b(name: &'static str, url: &'static str) -> Broadcaster {
    Broadcaster { name, url }
}

/// Every country row carries a `PremierLeague` entry, used as its fallback.
const BROADCASTERS: &[CountryRow] = &[
    ("GB", &[
        (PremierLeague, b("Sky Sports / TNT Sports", "https://www.sky.com/watch/sports")),
        (European, b("TNT Sports", "https://www.tntsports.co.uk/football")),
        (DomesticCup, b("BBC / ITV", "https://www.bbc.co.uk/sport/football")),
    ]),
    ("US", &[
        (PremierLeague, b("NBC / Peacock", "https://www.peacocktv.com/sports/soccer/premier-league")),
        (European, b("Paramount+", "https://www.paramountplus.com/shows/uefa-champions-league/")),
        (DomesticCup, b("ESPN+", "https://plus.espn.com/soccer")),
    ]),
    ("CA", &[
        (PremierLeague, b("FuboTV", "https://www.fubo.tv/welcome/channels")),
        (European, b("DAZN", "https://www.dazn.com/en-CA/sport/football")),
    ]),
    ("AU", &[
        (PremierLeague, b("Optus Sport", "https://www.optus.com.au/sport/optus-sport")),
        (European, b("Stan Sport", "https://www.stan.com.au/sport")),
    ]),
    ("DE", &[
        (PremierLeague, b("Sky Deutschland", "https://www.sky.de/fussball/premier-league")),
        (European, b("DAZN", "https://www.dazn.com/de-DE/sport/football")),
    ]),
    ("FR", &[
        (PremierLeague, b("Canal+", "https://www.canalplus.com/sport/football")),
    ]),
    ("ES", &[
        (PremierLeague, b("DAZN", "https://www.dazn.com/es-ES/sport/football")),
        (European, b("Movistar Plus+", "https://www.movistarplus.es/deportes/futbol")),
    ]),
    ("IT", &[
        (PremierLeague, b("Sky Italia", "https://sport.sky.it/calcio/premier-league")),
    ]),
    ("NL", &[
        (PremierLeague, b("Viaplay", "https://viaplay.nl/sport/voetbal")),
        (European, b("Ziggo Sport", "https://www.ziggosport.nl/")),
    ]),
    ("IN", &[
        (PremierLeague, b("Star Sports / Hotstar", "https://www.hotstar.com/sports/football")),
        (European, b("Sony Sports", "https://www.sonysportsnetwork.com/")),
    ]),
];

/// Look up a broadcaster for `country` (ISO alpha-2, any case).
///
/// Falls back from the exact category to the country's Premier League
/// entry, then to [`DEFAULT_BROADCASTER`].
pub fn lookup(country: &str, category: CompetitionCategory) -> Broadcaster {
    let country = country.trim().to_ascii_uppercase();
    let Some((_, entries)) = BROADCASTERS.iter().find(|(code, _)| *code == country) else {
        return DEFAULT_BROADCASTER;
    };
    let by_category = |cat: CompetitionCategory| {
        entries.iter().find(|(c, _)| *c == cat).map(|(_, found)| *found)
    };
    by_category(category)
        .or_else(|| by_category(PremierLeague))
        .unwrap_or(DEFAULT_BROADCASTER)
}
