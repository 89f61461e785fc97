//! The Holy Rosary: mysteries and a bead-by-bead walk
//!
//! [`MysterySet::for_weekday`] picks the mysteries traditionally prayed on a
//! given day. [`RosaryWalk`] steps through the opening prayers, the five
//! decades and the closing prayer, announcing each mystery as its decade
//! starts.

use chrono::Weekday;

/// The four sets of mysteries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MysterySet {
    Joyful,
    Sorrowful,
    Glorious,
    Luminous,
}

impl MysterySet {
    /// The set prayed on `weekday`
    pub fn for_weekday(weekday: Weekday) -> MysterySet {
        match weekday {
            Weekday::Sun | Weekday::Wed => MysterySet::Glorious,
            Weekday::Mon | Weekday::Sat => MysterySet::Joyful,
            Weekday::Tue | Weekday::Fri => MysterySet::Sorrowful,
            Weekday::Thu => MysterySet::Luminous,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MysterySet::Joyful => "Joyful Mysteries",
            MysterySet::Sorrowful => "Sorrowful Mysteries",
            MysterySet::Glorious => "Glorious Mysteries",
            MysterySet::Luminous => "Luminous Mysteries",
        }
    }

    /// Cycles Joyful, Sorrowful, Glorious, Luminous
    pub fn next(self) -> MysterySet {
        match self {
            MysterySet::Joyful => MysterySet::Sorrowful,
            MysterySet::Sorrowful => MysterySet::Glorious,
            MysterySet::Glorious => MysterySet::Luminous,
            MysterySet::Luminous => MysterySet::Joyful,
        }
    }

    pub fn mysteries(self) -> &'static [Mystery; 5] {
        match self {
            MysterySet::Joyful => &JOYFUL,
            MysterySet::Sorrowful => &SORROWFUL,
            MysterySet::Glorious => &GLORIOUS,
            MysterySet::Luminous => &LUMINOUS,
        }
    }
}

/// One mystery meditated on during a decade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mystery {
    pub title: &'static str,
    pub scripture: &'static str,
    pub fruit: &'static str,
    pub reflection: &'static str,
}

const fn mystery(
    title: &'static str,
    scripture: &'static str,
    fruit: &'static str,
    reflection: &'static str,
) -> Mystery {
    Mystery {
        title,
        scripture,
        fruit,
        reflection,
    }
}

static JOYFUL: [Mystery; 5] = [
    mystery(
        "The Annunciation",
        "Luke 1:26-38",
        "Humility",
        "The angel Gabriel announces to Mary that she will conceive the Son of God.",
    ),
    mystery(
        "The Visitation",
        "Luke 1:39-56",
        "Love of Neighbor",
        "Mary visits her cousin Elizabeth, who recognizes her as the mother of the Lord.",
    ),
    mystery(
        "The Nativity",
        "Luke 2:1-20",
        "Poverty of Spirit",
        "Jesus is born in Bethlehem and laid in a manger.",
    ),
    mystery(
        "The Presentation in the Temple",
        "Luke 2:22-38",
        "Obedience",
        "Mary and Joseph present the child to the Lord, and Simeon greets him.",
    ),
    mystery(
        "The Finding in the Temple",
        "Luke 2:41-52",
        "Piety",
        "After three days Jesus is found in his Father's house among the teachers.",
    ),
];

static SORROWFUL: [Mystery; 5] = [
    mystery(
        "The Agony in the Garden",
        "Matthew 26:36-46",
        "Sorrow for Sin",
        "Jesus prays in Gethsemane that the Father's will be done.",
    ),
    mystery(
        "The Scourging at the Pillar",
        "Mark 15:15",
        "Purity",
        "Pilate has Jesus scourged before handing him over.",
    ),
    mystery(
        "The Crowning with Thorns",
        "Matthew 27:27-31",
        "Courage",
        "The soldiers mock Jesus as king and crown him with thorns.",
    ),
    mystery(
        "The Carrying of the Cross",
        "John 19:17",
        "Patience",
        "Jesus carries his cross to Golgotha.",
    ),
    mystery(
        "The Crucifixion",
        "Luke 23:33-46",
        "Perseverance",
        "Jesus dies on the cross, commending his spirit to the Father.",
    ),
];

static GLORIOUS: [Mystery; 5] = [
    mystery(
        "The Resurrection",
        "Mark 16:1-8",
        "Faith",
        "On the third day Jesus rises from the dead.",
    ),
    mystery(
        "The Ascension",
        "Acts 1:6-11",
        "Hope",
        "Jesus ascends to the Father and promises the Spirit.",
    ),
    mystery(
        "The Descent of the Holy Spirit",
        "Acts 2:1-13",
        "Love of God",
        "The Spirit comes upon Mary and the Apostles at Pentecost.",
    ),
    mystery(
        "The Assumption",
        "Revelation 12:1",
        "Grace of a Happy Death",
        "Mary is taken up body and soul into heaven.",
    ),
    mystery(
        "The Coronation of Mary",
        "Revelation 12:1-2",
        "Trust in Mary's Intercession",
        "Mary is crowned Queen of Heaven and Earth.",
    ),
];

static LUMINOUS: [Mystery; 5] = [
    mystery(
        "The Baptism of the Lord",
        "Matthew 3:13-17",
        "Openness to the Holy Spirit",
        "The Father calls Jesus his beloved Son at the Jordan.",
    ),
    mystery(
        "The Wedding at Cana",
        "John 2:1-11",
        "To Jesus through Mary",
        "At his mother's word Jesus turns water into wine.",
    ),
    mystery(
        "The Proclamation of the Kingdom",
        "Mark 1:14-15",
        "Repentance",
        "Jesus calls all to conversion and to believe the Gospel.",
    ),
    mystery(
        "The Transfiguration",
        "Luke 9:28-36",
        "Desire for Holiness",
        "Jesus is transfigured before Peter, James and John.",
    ),
    mystery(
        "The Institution of the Eucharist",
        "Luke 22:14-20",
        "Adoration",
        "Jesus gives his Body and Blood at the Last Supper.",
    ),
];

/// The prayer said on one bead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bead {
    SignOfTheCross,
    ApostlesCreed,
    OurFather,
    HailMary,
    GloryBe,
    FatimaPrayer,
    HailHolyQueen,
}

impl Bead {
    pub fn name(self) -> &'static str {
        match self {
            Bead::SignOfTheCross => "Sign of the Cross",
            Bead::ApostlesCreed => "Apostles' Creed",
            Bead::OurFather => "Our Father",
            Bead::HailMary => "Hail Mary",
            Bead::GloryBe => "Glory Be",
            Bead::FatimaPrayer => "Fatima Prayer",
            Bead::HailHolyQueen => "Hail, Holy Queen",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Bead::SignOfTheCross => {
                "In the name of the Father, and of the Son, and of the Holy Spirit. Amen."
            }
            Bead::ApostlesCreed => {
                "I believe in God, the Father almighty, Creator of heaven and earth, \
                 and in Jesus Christ, his only Son, our Lord..."
            }
            Bead::OurFather => {
                "Our Father, who art in heaven, hallowed be thy name; thy kingdom come; \
                 thy will be done on earth as it is in heaven. Give us this day our daily bread; \
                 and forgive us our trespasses as we forgive those who trespass against us; \
                 and lead us not into temptation, but deliver us from evil. Amen."
            }
            Bead::HailMary => {
                "Hail Mary, full of grace, the Lord is with thee. \
                 Blessed art thou among women, and blessed is the fruit of thy womb, Jesus. \
                 Holy Mary, Mother of God, pray for us sinners, \
                 now and at the hour of our death. Amen."
            }
            Bead::GloryBe => {
                "Glory be to the Father, and to the Son, and to the Holy Spirit. \
                 As it was in the beginning, is now, and ever shall be, world without end. Amen."
            }
            Bead::FatimaPrayer => {
                "O my Jesus, forgive us our sins, save us from the fires of hell, \
                 lead all souls to Heaven, especially those who are in most need of Thy mercy."
            }
            Bead::HailHolyQueen => {
                "Hail, holy Queen, Mother of mercy, our life, our sweetness and our hope. \
                 Pray for us, O holy Mother of God, \
                 that we may be made worthy of the promises of Christ. Amen."
            }
        }
    }
}

/// Opening prayers said on the crucifix and the first beads
const OPENING: [Bead; 7] = [
    Bead::SignOfTheCross,
    Bead::ApostlesCreed,
    Bead::OurFather,
    Bead::HailMary,
    Bead::HailMary,
    Bead::HailMary,
    Bead::GloryBe,
];

/// Our Father, ten Hail Marys, Glory Be, Fatima Prayer
const DECADE_LEN: usize = 13;

const DECADES: usize = 5;

/// Hail, Holy Queen and the final Sign of the Cross
const CLOSING: [Bead; 2] = [Bead::HailHolyQueen, Bead::SignOfTheCross];

/// Number of steps in a full rosary
pub const TOTAL_STEPS: usize = OPENING.len() + DECADES * DECADE_LEN + CLOSING.len();

/// Where one step of the walk falls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub bead: Bead,
    /// Decade index (0 to 4), `None` for the opening and closing prayers
    pub decade: Option<usize>,
    /// Position of a Hail Mary within its group, starting at 1
    pub hail_mary: Option<usize>,
}

fn step_at(index: usize) -> Step {
    if index < OPENING.len() {
        return Step {
            bead: OPENING[index],
            decade: None,
            hail_mary: (OPENING[index] == Bead::HailMary).then(|| index - 2),
        };
    }

    let in_decades = index - OPENING.len();
    if in_decades < DECADES * DECADE_LEN {
        let position = in_decades % DECADE_LEN;
        let bead = match position {
            0 => Bead::OurFather,
            1..=10 => Bead::HailMary,
            11 => Bead::GloryBe,
            _ => Bead::FatimaPrayer,
        };
        return Step {
            bead,
            decade: Some(in_decades / DECADE_LEN),
            hail_mary: (bead == Bead::HailMary).then_some(position),
        };
    }

    let closing = (in_decades - DECADES * DECADE_LEN).min(CLOSING.len() - 1);
    Step {
        bead: CLOSING[closing],
        decade: None,
        hail_mary: None,
    }
}

/// How many of each main prayer have been said so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrayerCount {
    pub our_father: usize,
    pub hail_mary: usize,
    pub glory_be: usize,
}

/// Progress through one rosary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosaryWalk {
    pub set: MysterySet,
    step: usize,
}

impl RosaryWalk {
    /// A walk at the first bead
    pub fn new(set: MysterySet) -> Self {
        Self { set, step: 0 }
    }

    /// Index of the current step, from 0 to `TOTAL_STEPS - 1`
    pub fn position(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> Step {
        step_at(self.step)
    }

    /// The mystery of the current decade, if inside one
    pub fn mystery(&self) -> Option<&'static Mystery> {
        self.current()
            .decade
            .map(|decade| &self.set.mysteries()[decade])
    }

    pub fn is_finished(&self) -> bool {
        self.step == TOTAL_STEPS - 1
    }

    /// Moves to the next bead; stays on the last one
    pub fn advance(&mut self) {
        if !self.is_finished() {
            self.step += 1;
        }
    }

    /// Moves to the previous bead; stays on the first one
    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Jumps to the Our Father of the next decade
    ///
    /// From the opening prayers this is the first decade; from the last
    /// decade it is the closing prayers.
    pub fn next_decade(&mut self) {
        let next = match self.current().decade {
            Some(decade) => decade + 1,
            None if self.step < OPENING.len() => 0,
            None => return,
        };
        self.step = (OPENING.len() + next * DECADE_LEN).min(TOTAL_STEPS - 1);
    }

    /// Jumps to the Our Father of the previous decade, or the start
    pub fn previous_decade(&mut self) {
        let current = match self.current().decade {
            Some(decade) => decade,
            None if self.step < OPENING.len() => 0,
            None => DECADES,
        };
        self.step = match current {
            0 => 0,
            decade => OPENING.len() + (decade - 1) * DECADE_LEN,
        };
    }

    /// Back to the first bead with another set of mysteries
    pub fn restart(&mut self, set: MysterySet) {
        *self = Self::new(set);
    }

    /// Prayers said up to and including the current bead
    pub fn counts(&self) -> PrayerCount {
        let mut count = PrayerCount::default();
        for index in 0..=self.step {
            match step_at(index).bead {
                Bead::OurFather => count.our_father += 1,
                Bead::HailMary => count.hail_mary += 1,
                Bead::GloryBe => count.glory_be += 1,
                _ => {}
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_mysteries() {
        assert_eq!(MysterySet::for_weekday(Weekday::Sun), MysterySet::Glorious);
        assert_eq!(MysterySet::for_weekday(Weekday::Mon), MysterySet::Joyful);
        assert_eq!(MysterySet::for_weekday(Weekday::Tue), MysterySet::Sorrowful);
        assert_eq!(MysterySet::for_weekday(Weekday::Wed), MysterySet::Glorious);
        assert_eq!(MysterySet::for_weekday(Weekday::Thu), MysterySet::Luminous);
        assert_eq!(MysterySet::for_weekday(Weekday::Fri), MysterySet::Sorrowful);
        assert_eq!(MysterySet::for_weekday(Weekday::Sat), MysterySet::Joyful);
    }

    #[test]
    fn test_next_set_cycles_through_all_four() {
        let mut set = MysterySet::Joyful;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(set.name());
            set = set.next();
        }
        assert_eq!(set, MysterySet::Joyful);
        assert_eq!(seen.len(), 4);
        assert_eq!(MysterySet::Joyful.mysteries()[0].title, "The Annunciation");
        assert_eq!(MysterySet::Joyful.mysteries()[1].fruit, "Love of Neighbor");
    }

    #[test]
    fn test_opening_prayers() {
        let mut walk = RosaryWalk::new(MysterySet::Joyful);
        assert_eq!(walk.current().bead, Bead::SignOfTheCross);
        assert!(walk.mystery().is_none());

        for _ in 0..3 {
            walk.advance();
        }
        assert_eq!(walk.current().bead, Bead::HailMary);
        assert_eq!(walk.current().hail_mary, Some(1));
    }

    #[test]
    fn test_first_decade_announces_mystery() {
        let mut walk = RosaryWalk::new(MysterySet::Sorrowful);
        walk.next_decade();

        assert_eq!(walk.current().bead, Bead::OurFather);
        assert_eq!(walk.mystery().unwrap().title, "The Agony in the Garden");

        for _ in 0..10 {
            walk.advance();
        }
        assert_eq!(walk.current().hail_mary, Some(10));
        walk.advance();
        assert_eq!(walk.current().bead, Bead::GloryBe);
        walk.advance();
        assert_eq!(walk.current().bead, Bead::FatimaPrayer);
        walk.advance();
        assert_eq!(walk.mystery().unwrap().title, "The Scourging at the Pillar");
    }

    #[test]
    fn test_full_walk_counts_prayers_and_stops_at_end() {
        let mut walk = RosaryWalk::new(MysterySet::Luminous);
        for _ in 0..TOTAL_STEPS + 5 {
            walk.advance();
        }

        assert!(walk.is_finished());
        assert_eq!(walk.current().bead, Bead::SignOfTheCross);
        assert_eq!(
            walk.counts(),
            PrayerCount {
                our_father: 6,
                hail_mary: 53,
                glory_be: 6,
            }
        );
    }

    #[test]
    fn test_back_stops_at_start() {
        let mut walk = RosaryWalk::new(MysterySet::Glorious);
        walk.back();
        assert_eq!(walk.position(), 0);

        walk.advance();
        walk.back();
        assert_eq!(walk.position(), 0);
    }

    #[test]
    fn test_decade_jumps() {
        let mut walk = RosaryWalk::new(MysterySet::Joyful);
        for _ in 0..5 {
            walk.next_decade();
        }
        assert_eq!(walk.current().decade, Some(4));

        walk.next_decade();
        assert_eq!(walk.current().bead, Bead::HailHolyQueen);
        walk.next_decade();
        assert_eq!(walk.current().bead, Bead::HailHolyQueen);

        walk.previous_decade();
        assert_eq!(walk.current().decade, Some(4));
        walk.advance();
        walk.previous_decade();
        assert_eq!(walk.current().decade, Some(3));

        walk.restart(MysterySet::Glorious);
        walk.previous_decade();
        assert_eq!(walk.position(), 0);
        assert_eq!(walk.set, MysterySet::Glorious);
    }
}
