//! Static mantra catalog.
//!
//! The catalog is a read-only registry seeded once at startup. Browsing
//! composes a category filter with a case-insensitive substring search
//! (logical AND); neither has side effects.

use crate::models::{CategoryFilter, Mantra, MantraCategory};

pub struct MantraCatalog {
    mantras: Vec<Mantra>,
}

impl MantraCatalog {
    /// Build the reference catalog of seven mantras.
    pub fn seeded() -> Self {
        Self {
            mantras: seed_mantras(),
        }
    }

    /// Every mantra, in insertion order.
    pub fn all(&self) -> &[Mantra] {
        &self.mantras
    }

    /// Look up a mantra by its slug.
    pub fn get(&self, id: &str) -> Option<&Mantra> {
        self.mantras.iter().find(|m| m.id == id)
    }

    /// Mantras matching the category filter, in insertion order.
    pub fn by_category(&self, filter: CategoryFilter) -> Vec<&Mantra> {
        self.mantras
            .iter()
            .filter(|m| filter.matches(m.category))
            .collect()
    }

    /// Case-insensitive substring match against name, text and description.
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Mantra> {
        let term = term.to_lowercase();
        self.mantras
            .iter()
            .filter(|m| matches_term(m, &term))
            .collect()
    }

    /// Category filter and search term combined, the contract used by
    /// catalog browsing.
    pub fn browse(&self, filter: CategoryFilter, term: &str) -> Vec<&Mantra> {
        let term = term.to_lowercase();
        self.mantras
            .iter()
            .filter(|m| filter.matches(m.category) && matches_term(m, &term))
            .collect()
    }
}

fn matches_term(mantra: &Mantra, lower_term: &str) -> bool {
    if lower_term.is_empty() {
        return true;
    }
    mantra.name.to_lowercase().contains(lower_term)
        || mantra.text.to_lowercase().contains(lower_term)
        || mantra.description.to_lowercase().contains(lower_term)
}

fn seed_mantras() -> Vec<Mantra> {
    vec![
        Mantra {
            id: "om-namah-shivaya".to_string(),
            name: "Om Namah Shivaya".to_string(),
            text: "Om Namah Shivaya".to_string(),
            description: "The five-syllable panchakshari mantra of Lord Shiva, \
                          recited for inner stillness and protection."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/om-namah-shivaya.mp3".to_string(),
            category: MantraCategory::Shiva,
        },
        Mantra {
            id: "gayatri-mantra".to_string(),
            name: "Gayatri Mantra".to_string(),
            text: "Om Bhur Bhuvah Svaha, Tat Savitur Varenyam, \
                   Bhargo Devasya Dhimahi, Dhiyo Yo Nah Prachodayat"
                .to_string(),
            description: "The Vedic prayer to Savitr for illumination of the \
                          intellect, traditionally recited at dawn."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/gayatri-mantra.mp3".to_string(),
            category: MantraCategory::Vedic,
        },
        Mantra {
            id: "krishna-mantra".to_string(),
            name: "Krishna Mantra".to_string(),
            text: "Hare Krishna Hare Krishna, Krishna Krishna Hare Hare, \
                   Hare Rama Hare Rama, Rama Rama Hare Hare"
                .to_string(),
            description: "The maha-mantra of devotion to Lord Krishna, recited \
                          for joy and surrender."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/krishna-mantra.mp3".to_string(),
            category: MantraCategory::Vishnu,
        },
        Mantra {
            id: "mahamrityunjaya-mantra".to_string(),
            name: "Mahamrityunjaya Mantra".to_string(),
            text: "Om Tryambakam Yajamahe, Sugandhim Pushtivardhanam, \
                   Urvarukamiva Bandhanan, Mrityor Mukshiya Maamritat"
                .to_string(),
            description: "The great death-conquering mantra of Lord Shiva, \
                          recited for healing and longevity."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/mahamrityunjaya-mantra.mp3".to_string(),
            category: MantraCategory::Shiva,
        },
        Mantra {
            id: "ganesh-mantra".to_string(),
            name: "Ganesh Mantra".to_string(),
            text: "Om Gan Ganapataye Namah".to_string(),
            description: "Invocation of Lord Ganesha, the remover of obstacles, \
                          recited before new beginnings."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/ganesh-mantra.mp3".to_string(),
            category: MantraCategory::Ganesha,
        },
        Mantra {
            id: "hanuman-mantra".to_string(),
            name: "Hanuman Mantra".to_string(),
            text: "Om Han Hanumate Namah".to_string(),
            description: "Invocation of Lord Hanuman for strength, courage and \
                          freedom from fear."
                .to_string(),
            target_count: 11,
            audio_url: "https://audio.japamala.in/hanuman-mantra.mp3".to_string(),
            category: MantraCategory::Hanuman,
        },
        Mantra {
            id: "durga-mantra".to_string(),
            name: "Durga Mantra".to_string(),
            text: "Om Dum Durgayei Namaha".to_string(),
            description: "Invocation of Goddess Durga for protection and the \
                          removal of negativity."
                .to_string(),
            target_count: 108,
            audio_url: "https://audio.japamala.in/durga-mantra.mp3".to_string(),
            category: MantraCategory::Devi,
        },
    ]
}
