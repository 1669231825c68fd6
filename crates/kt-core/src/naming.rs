//! Attempt label generation.
//!
//! Labels read like `admiring_turing_3fa91c`: an adjective and a surname for the
//! operator, plus a random hex suffix that keeps concurrent attempts in the same
//! namespace from ever colliding in practice.
use kt_model::AttemptLabel;
use rand::{Rng, seq::SliceRandom};

const ADJECTIVES: &[&str] = &[
    "admiring", "adoring", "agitated", "amazing", "angry", "awesome", "blissful", "bold",
    "brave", "busy", "charming", "clever", "compassionate", "competent", "condescending",
    "confident", "cool", "cranky", "dazzling", "determined", "distracted", "dreamy", "eager",
    "ecstatic", "elastic", "elated", "elegant", "epic", "fervent", "festive", "flamboyant",
    "focused", "friendly", "frosty", "gallant", "gifted", "goofy", "gracious", "happy",
    "hardcore", "heuristic", "hopeful", "hungry", "infallible", "inspiring", "jolly", "jovial",
    "keen", "kind", "laughing", "loving", "lucid", "magical", "modest", "musing", "mystifying",
    "naughty", "nervous", "nifty", "nostalgic", "objective", "optimistic", "peaceful",
    "pedantic", "pensive", "practical", "priceless", "quirky", "quizzical", "relaxed",
    "reverent", "romantic", "serene", "sharp", "silly", "sleepy", "stoic", "strange",
    "stupefied", "suspicious", "sweet", "tender", "thirsty", "trusting", "unruffled",
    "upbeat", "vibrant", "vigilant", "vigorous", "wizardly", "wonderful", "xenodochial",
    "youthful", "zealous", "zen",
];

const SURNAMES: &[&str] = &[
    "agnesi", "albattani", "allen", "almeida", "archimedes", "ardinghelli", "babbage",
    "banach", "bardeen", "bartik", "bell", "bhabha", "blackwell", "bohr", "booth", "bose",
    "brattain", "brown", "carson", "cerf", "chandrasekhar", "clarke", "curie", "darwin",
    "davinci", "dijkstra", "einstein", "elion", "engelbart", "euclid", "euler", "fermat",
    "fermi", "feynman", "franklin", "galileo", "gauss", "goldberg", "goodall", "hamilton",
    "hawking", "heisenberg", "hodgkin", "hopper", "hypatia", "jackson", "jennings", "johnson",
    "kalam", "kepler", "khorana", "knuth", "kowalevski", "lalande", "lamarr", "lamport",
    "leakey", "lovelace", "lumiere", "mccarthy", "mclean", "meitner", "mendel", "minsky",
    "mirzakhani", "morse", "napier", "newton", "nobel", "noether", "pare", "pascal",
    "pasteur", "payne", "perlman", "pike", "poincare", "ptolemy", "raman", "ramanujan",
    "ritchie", "rosalind", "sammet", "shannon", "shockley", "sinoussi", "stallman",
    "swanson", "tesla", "thompson", "torvalds", "turing", "varahamihira", "visvesvaraya",
    "wescoff", "wilbur", "wiles", "williams", "wing", "wozniak", "wright", "yalow", "yonath",
];

/// Random hex digits appended to every label.
const SUFFIX_LEN: usize = 6;

/// Produces fresh [`AttemptLabel`]s. Stateless; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameGenerator;

impl NameGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A new label, e.g. `admiring_turing_3fa91c`.
    pub fn generate(&self) -> AttemptLabel {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Same as [`NameGenerator::generate`] with a caller-supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> AttemptLabel {
        let adjective = ADJECTIVES.choose(&mut *rng).copied().unwrap_or("eager");
        let surname = SURNAMES.choose(&mut *rng).copied().unwrap_or("turing");
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
            .collect();

        AttemptLabel::new(format!("{adjective}_{surname}_{suffix}"))
            .unwrap_or_else(|_| unreachable!("word lists only hold lowercase ascii words"))
    }
}
