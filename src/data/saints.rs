//! Bundled calendar of saints
//!
//! A short list of well-known feasts, browsed month by month in the saints
//! view and used as the offline answer for the saint of the day.

use chrono::{Datelike, NaiveDate};

/// English month names, indexed from zero
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A saint with a fixed feast day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saint {
    pub name: &'static str,
    /// Feast month, 1 to 12
    pub month: u32,
    pub day: u32,
    pub description: &'static str,
    pub patronage: &'static [&'static str],
}

impl Saint {
    /// Feast day written out, e.g. "October 4"
    pub fn feast_label(&self) -> String {
        format!("{} {}", month_name(self.month), self.day)
    }

    /// Case-insensitive match on name, description or patronage
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .patronage
                .iter()
                .any(|p| p.to_lowercase().contains(&query))
    }
}

/// Name of `month` (1 to 12); out-of-range months wrap
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.saturating_sub(1) % 12) as usize]
}

static SAINTS: [Saint; 26] = [
    Saint {
        name: "Solemnity of Mary, Mother of God",
        month: 1,
        day: 1,
        description: "The Blessed Virgin Mary is honored under this title for her role \
                      as the mother of Jesus Christ, the Son of God.",
        patronage: &["mothers", "universal church"],
    },
    Saint {
        name: "Sts. Basil the Great and Gregory Nazianzen",
        month: 1,
        day: 2,
        description: "Bishops and Doctors of the Church, known for their theological \
                      writings and defense of orthodoxy.",
        patronage: &["theologians", "education"],
    },
    Saint {
        name: "St. Thomas Aquinas",
        month: 1,
        day: 28,
        description: "Dominican friar and Doctor of the Church whose Summa Theologiae \
                      joined faith and reason.",
        patronage: &["students", "universities", "philosophers"],
    },
    Saint {
        name: "Sts. Cyril and Methodius",
        month: 2,
        day: 14,
        description: "Brothers who brought the Gospel to the Slavic peoples and gave \
                      them a written liturgy.",
        patronage: &["Europe", "Slavic peoples"],
    },
    Saint {
        name: "St. Polycarp",
        month: 2,
        day: 23,
        description: "Bishop of Smyrna and disciple of St. John, martyred for refusing \
                      to renounce Christ.",
        patronage: &["earache sufferers"],
    },
    Saint {
        name: "St. Patrick",
        month: 3,
        day: 17,
        description: "Missionary bishop who returned to the land of his captivity and \
                      converted Ireland.",
        patronage: &["Ireland", "engineers"],
    },
    Saint {
        name: "St. Joseph, Spouse of the Blessed Virgin Mary",
        month: 3,
        day: 19,
        description: "The carpenter of Nazareth who protected the Holy Family with \
                      quiet faithfulness.",
        patronage: &["universal church", "fathers", "workers", "a happy death"],
    },
    Saint {
        name: "St. Mark, Evangelist",
        month: 4,
        day: 25,
        description: "Companion of Peter and Paul and author of the earliest Gospel.",
        patronage: &["Venice", "notaries"],
    },
    Saint {
        name: "St. Catherine of Siena",
        month: 4,
        day: 29,
        description: "Dominican tertiary, mystic and Doctor of the Church who urged \
                      the popes to return to Rome.",
        patronage: &["Italy", "Europe", "nurses"],
    },
    Saint {
        name: "St. Matthias, Apostle",
        month: 5,
        day: 14,
        description: "Chosen by lot to take the place of Judas among the Twelve.",
        patronage: &["carpenters", "tailors"],
    },
    Saint {
        name: "St. Philip Neri",
        month: 5,
        day: 26,
        description: "Joyful priest of Rome and founder of the Oratory.",
        patronage: &["Rome", "humorists"],
    },
    Saint {
        name: "St. Anthony of Padua",
        month: 6,
        day: 13,
        description: "Franciscan preacher and Doctor of the Church, invoked for \
                      finding what is lost.",
        patronage: &["lost items", "the poor", "travelers"],
    },
    Saint {
        name: "Sts. Peter and Paul, Apostles",
        month: 6,
        day: 29,
        description: "The rock on whom Christ built his Church and the Apostle to the \
                      Gentiles, both martyred in Rome.",
        patronage: &["Rome", "fishermen", "missionaries"],
    },
    Saint {
        name: "St. Benedict",
        month: 7,
        day: 11,
        description: "Father of Western monasticism whose Rule shaped prayer and work \
                      for centuries.",
        patronage: &["Europe", "monks", "farmers"],
    },
    Saint {
        name: "St. Ignatius of Loyola",
        month: 7,
        day: 31,
        description: "Soldier turned pilgrim who founded the Society of Jesus and wrote \
                      the Spiritual Exercises.",
        patronage: &["soldiers", "retreats"],
    },
    Saint {
        name: "St. Dominic",
        month: 8,
        day: 8,
        description: "Founder of the Order of Preachers, devoted to study and the \
                      Rosary.",
        patronage: &["astronomers", "the Dominican Republic"],
    },
    Saint {
        name: "St. Augustine",
        month: 8,
        day: 28,
        description: "Bishop of Hippo and Doctor of Grace whose Confessions tell of his \
                      conversion.",
        patronage: &["theologians", "printers", "brewers"],
    },
    Saint {
        name: "St. Pio of Pietrelcina",
        month: 9,
        day: 23,
        description: "Capuchin friar and confessor who bore the stigmata.",
        patronage: &["civil defense volunteers", "adolescents"],
    },
    Saint {
        name: "St. Jerome",
        month: 9,
        day: 30,
        description: "Priest and Doctor of the Church who translated the Scriptures \
                      into Latin.",
        patronage: &["translators", "librarians", "scholars"],
    },
    Saint {
        name: "St. Thérèse of the Child Jesus",
        month: 10,
        day: 1,
        description: "Carmelite nun whose Little Way taught holiness in ordinary \
                      things.",
        patronage: &["missions", "florists", "France"],
    },
    Saint {
        name: "St. Francis of Assisi",
        month: 10,
        day: 4,
        description: "Embraced poverty to follow Christ and founded the Friars Minor.",
        patronage: &["animals", "ecology", "Italy"],
    },
    Saint {
        name: "St. Luke, Evangelist",
        month: 10,
        day: 18,
        description: "Physician and companion of Paul who wrote the third Gospel and \
                      the Acts of the Apostles.",
        patronage: &["physicians", "artists"],
    },
    Saint {
        name: "All Saints",
        month: 11,
        day: 1,
        description: "The Church honors all the saints, known and unknown, who share \
                      the glory of heaven.",
        patronage: &[],
    },
    Saint {
        name: "St. Cecilia",
        month: 11,
        day: 22,
        description: "Roman virgin and martyr who sang to God in her heart.",
        patronage: &["musicians", "poets"],
    },
    Saint {
        name: "St. Nicholas",
        month: 12,
        day: 6,
        description: "Bishop of Myra remembered for his secret generosity to the poor.",
        patronage: &["children", "sailors", "merchants"],
    },
    Saint {
        name: "Our Lady of Guadalupe",
        month: 12,
        day: 12,
        description: "Mary appeared to St. Juan Diego at Tepeyac and left her image on \
                      his tilma.",
        patronage: &["the Americas", "Mexico", "the unborn"],
    },
];

/// Saints whose feast falls in `month`, in calendar order
pub fn saints_in_month(month: u32) -> Vec<&'static Saint> {
    SAINTS.iter().filter(|saint| saint.month == month).collect()
}

/// Saints anywhere in the calendar matching `query`
pub fn search_saints(query: &str) -> Vec<&'static Saint> {
    SAINTS.iter().filter(|saint| saint.matches(query)).collect()
}

/// The bundled saint celebrated on `date`, if the calendar has one
pub fn saint_on(date: NaiveDate) -> Option<&'static Saint> {
    SAINTS
        .iter()
        .find(|saint| saint.month == date.month() && saint.day == date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_is_sorted_and_valid() {
        for pair in SAINTS.windows(2) {
            assert!(
                (pair[0].month, pair[0].day) < (pair[1].month, pair[1].day),
                "{} should come before {}",
                pair[0].name,
                pair[1].name
            );
        }
        for saint in &SAINTS {
            assert!(
                NaiveDate::from_ymd_opt(2024, saint.month, saint.day).is_some(),
                "{} has an invalid feast day",
                saint.name
            );
        }
    }

    #[test]
    fn test_every_month_has_saints() {
        for month in 1..=12 {
            assert!(!saints_in_month(month).is_empty(), "no saints in {}", month_name(month));
        }
        assert!(saints_in_month(13).is_empty());
    }

    #[test]
    fn test_saint_on_matches_feast_day() {
        let luke = saint_on(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).unwrap();
        assert_eq!(luke.name, "St. Luke, Evangelist");
        assert_eq!(luke.feast_label(), "October 18");

        assert!(saint_on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()).is_none());
    }

    #[test]
    fn test_matches_searches_patronage() {
        let anthony = saints_in_month(6)[0];

        assert!(anthony.matches("LOST"));
        assert!(anthony.matches("padua"));
        assert!(anthony.matches("  "));
        assert!(!anthony.matches("sailors"));
    }

    #[test]
    fn test_search_spans_all_months() {
        let names: Vec<&str> = search_saints("italy").iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["St. Catherine of Siena", "St. Francis of Assisi"]);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
    }
}
