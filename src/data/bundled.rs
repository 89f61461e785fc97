//! Static content shown when the provider is unavailable

use chrono::NaiveDate;

use super::saints::saint_on;
use super::{DailyReadings, Prayer, Reading, SaintOfDay};

/// (title, category, text) for each bundled prayer
static PRAYERS: [(&str, &str, &str); 6] = [
    (
        "Our Father",
        "Basic Prayers",
        "Our Father, who art in heaven, hallowed be thy name; thy kingdom come; \
         thy will be done on earth as it is in heaven. Give us this day our daily bread; \
         and forgive us our trespasses as we forgive those who trespass against us; \
         and lead us not into temptation, but deliver us from evil. Amen.",
    ),
    (
        "Hail Mary",
        "Marian Prayers",
        "Hail Mary, full of grace, the Lord is with thee; blessed art thou among women, \
         and blessed is the fruit of thy womb, Jesus. Holy Mary, Mother of God, \
         pray for us sinners, now and at the hour of our death. Amen.",
    ),
    (
        "Glory Be",
        "Basic Prayers",
        "Glory be to the Father, and to the Son, and to the Holy Spirit. \
         As it was in the beginning, is now, and ever shall be, world without end. Amen.",
    ),
    (
        "Apostles' Creed",
        "Creeds",
        "I believe in God, the Father almighty, Creator of heaven and earth, \
         and in Jesus Christ, his only Son, our Lord, who was conceived by the Holy Spirit, \
         born of the Virgin Mary, suffered under Pontius Pilate, \
         was crucified, died and was buried; \
         he descended into hell; on the third day he rose again from the dead; \
         he ascended into heaven, and is seated at the right hand of God the Father almighty; \
         from there he will come to judge the living and the dead. \
         I believe in the Holy Spirit, the holy catholic Church, the communion of saints, \
         the forgiveness of sins, the resurrection of the body, and life everlasting. Amen.",
    ),
    (
        "Morning Offering",
        "Morning Prayers",
        "O Jesus, through the Immaculate Heart of Mary, I offer you my prayers, works, joys, \
         and sufferings of this day for all the intentions of your Sacred Heart, \
         in union with the Holy Sacrifice of the Mass throughout the world, \
         for the salvation of souls, the reparation of sins, the reunion of all Christians, \
         and in particular for the intentions of the Holy Father this month. Amen.",
    ),
    (
        "Evening Prayer",
        "Evening Prayers",
        "Lord, thank you for the blessings of this day. Forgive me for any wrong I have done. \
         Watch over me and my loved ones through the night. May your angels protect us, \
         and may I wake refreshed to serve you tomorrow. Amen.",
    ),
];

/// Returns the bundled prayer list
pub fn bundled_prayers() -> Vec<Prayer> {
    PRAYERS
        .iter()
        .map(|(title, category, text)| Prayer {
            title: title.to_string(),
            category: category.to_string(),
            text: text.to_string(),
        })
        .collect()
}

/// Returns the bundled readings, dated for `date`
pub fn bundled_readings(date: NaiveDate) -> DailyReadings {
    DailyReadings {
        date: date.format("%B %-d, %Y").to_string(),
        feast: "Readings unavailable offline".to_string(),
        first_reading: Reading {
            citation: "1 John 4:7-10".to_string(),
            text: "Beloved, let us love one another, because love is of God; \
                   everyone who loves is begotten by God and knows God."
                .to_string(),
        },
        responsorial_psalm: Reading {
            citation: "Psalm 72:1-2, 3-4, 7-8".to_string(),
            text: "Lord, every nation on earth will adore you.".to_string(),
        },
        second_reading: None,
        gospel: Reading {
            citation: "Mark 6:34-44".to_string(),
            text: "When Jesus saw the vast crowd, his heart was moved with pity for them, \
                   for they were like sheep without a shepherd; \
                   and he began to teach them many things."
                .to_string(),
        },
    }
}

/// Returns the offline prayer of the day
pub fn bundled_prayer_of_day() -> Prayer {
    Prayer {
        title: "Prayer for Today".to_string(),
        category: "Daily Prayer".to_string(),
        text: "Lord, grant us your peace and guide us through this day. Amen.".to_string(),
    }
}

/// Returns the calendar saint for `date`, or a general commemoration
pub fn bundled_saint_of_day(date: NaiveDate) -> SaintOfDay {
    match saint_on(date) {
        Some(saint) => SaintOfDay {
            name: saint.name.to_string(),
            description: saint.description.to_string(),
        },
        None => SaintOfDay {
            name: "Saints of the Church".to_string(),
            description: "Today the Church honors the saints who inspire our faith journey."
                .to_string(),
        },
    }
}

/// Returns a generic reflection on the passage at `citation`
pub fn bundled_explanation(citation: &str) -> String {
    format!(
        "This reading from {} invites us to reflect on God's word and apply it to our lives.",
        citation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_prayers_have_unique_titles() {
        let prayers = bundled_prayers();
        let titles: HashSet<&str> = prayers.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(prayers.len(), 6);
        assert_eq!(titles.len(), prayers.len());
    }

    #[test]
    fn test_bundled_prayers_have_text() {
        for prayer in bundled_prayers() {
            assert!(!prayer.text.trim().is_empty(), "{} has no text", prayer.title);
            assert!(prayer.text.ends_with("Amen."), "{} should end with Amen.", prayer.title);
        }
    }

    #[test]
    fn test_bundled_readings_are_dated() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let readings = bundled_readings(date);

        assert_eq!(readings.date, "January 5, 2026");
        assert_eq!(readings.gospel.citation, "Mark 6:34-44");
        assert!(readings.second_reading.is_none());
    }

    #[test]
    fn test_bundled_saint_of_day_uses_calendar() {
        let luke = bundled_saint_of_day(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(luke.name, "St. Luke, Evangelist");

        let other = bundled_saint_of_day(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(other.name, "Saints of the Church");
        assert!(other.description.contains("inspire our faith journey"));
    }

    #[test]
    fn test_bundled_explanation_names_citation() {
        let text = bundled_explanation("Mark 6:34-44");
        assert!(text.starts_with("This reading from Mark 6:34-44 invites us"));
    }
}
