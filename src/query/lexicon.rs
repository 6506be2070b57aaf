//! Curated synonym and alias tables for the regulation/FAQ domain.
//!
//! All entries are stored in their ASCII-folded form, since both queries and
//! index tokens pass through the same folding before any lookup.

use std::sync::LazyLock;

use ahash::AHashMap;

/// Canonical phrase to related phrases, in fixed priority order.
///
/// Held as an ordered slice rather than a map so that expansion output is
/// deterministic across runs.
pub static SYNONYMS: &[(&str, &[&str])] = &[
    (
        "gecme notu",
        &[
            "basari notu",
            "gecme baraji",
            "not hesabi",
            "dersi gecme",
            "ortalama",
            "gecer not",
            "baraj",
        ],
    ),
    ("gecer not", &["gecme notu", "baraj", "basari notu"]),
    (
        "devamsizlik",
        &["devam", "yoklama", "devamsizlik hakki", "devam durumu"],
    ),
    ("vize", &["ara sinav", "yariyil ici", "orta sinav"]),
    ("final", &["genel sinav", "donem sonu", "bitirme sinavi"]),
    (
        "butunleme",
        &[
            "butunleme sinavi",
            "telafi sinavi",
            "but",
            "butun",
            "butunl",
            "butunle",
            "butu",
        ],
    ),
    (
        "not",
        &[
            "gecme notu",
            "not ortalamasi",
            "not hesabi",
            "puan",
            "basari notu",
        ],
    ),
    (
        "kayit",
        &["kayit yenileme", "yeniden kayit", "ders kaydi", "harc odeme"],
    ),
    (
        "danisman",
        &["akademik danisman", "danisman hoca", "danismanlik"],
    ),
    (
        "itiraz",
        &["not itiraz", "puan itiraz", "dilekce", "sonuca itiraz"],
    ),
    ("ders programi", &["program", "takvim", "ders saati"]),
    ("program", &["ders programi", "ders saati", "takvim"]),
    (
        "transkript",
        &[
            "not belgesi",
            "ogrenci transkript",
            "trans",
            "transkript belgesi",
        ],
    ),
    (
        "obs",
        &[
            "ogrenci otomasyon",
            "ogrenci bilgi sistemi",
            "otomasyon",
            "obs giris",
        ],
    ),
];

/// Abbreviation to canonical term, consulted for short single-token queries.
static SHORT_ALIASES: LazyLock<AHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    AHashMap::from_iter([
        ("but", "butunleme"),
        ("butun", "butunleme"),
        ("trans", "transkript"),
        ("transkriptim", "transkript"),
        ("obs", "obs"),
    ])
});

/// Resolve a folded query token through the short-alias map.
pub fn resolve_alias(token: &str) -> Option<&'static str> {
    SHORT_ALIASES.get(token).copied()
}
