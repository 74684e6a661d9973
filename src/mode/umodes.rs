//! Per-server-software user mode dictionaries.
//!
//! Letters are not portable across IRC daemons: `a` is "away" in RFC 2812
//! but "services admin" on Bahamut and Unreal. These tables give each
//! letter a stable upper-case name for a given daemon family.

/// RFC 2812 section 3.1.5 user modes.
pub static RFC2812: &[(char, &str)] = &[
    ('a', "AWAY"),
    ('i', "INVISIBLE"),
    ('o', "OPERATOR"),
    ('O', "LOCAL_OPERATOR"),
    ('r', "RESTRICTED_CONNECTION"),
    ('s', "SERVER_NOTICES"),
    ('w', "WALLOPS"),
];

static AUSTHEX: &[(char, &str)] = &[
    ('a', "ERRORS"),
    ('h', "HELPER"),
    ('l', "LISTALL"),
    ('t', "Z_LINED"),
    ('T', "W_LINED"),
    ('v', "HOST_HIDING"),
];

static BAHAMUT: &[(char, &str)] = &[
    ('a', "SERVICES_ADMIN"),
    ('A', "SERVER_ADMIN"),
    ('b', "CHATOPS"),
    ('d', "DEBUG"),
    ('f', "FLOODS"),
    ('g', "GLOBOPS"),
    ('h', "HELPER"),
    ('k', "KILLS"),
    ('m', "SPAMBOTS"),
    ('n', "ROUTING"),
    ('r', "REGISTERED"),
    ('R', "NO_NON_REGISTERED"),
    ('y', "STATS_LINKS"),
];

static HYBRID: &[(char, &str)] = &[
    ('a', "ADMIN"),
    ('b', "BOTS"),
    ('c', "CLIENT_CONNS"),
    ('d', "DEBUG"),
    ('f', "FULL"),
    ('g', "CALLERID"),
    ('k', "KILLS"),
    ('l', "LOCOPS"),
    ('n', "NCHANGE"),
    ('r', "REJ"),
    ('u', "UNAUTH"),
    ('x', "EXTERNAL"),
    ('y', "SPY"),
    ('z', "OPERWALL"),
];

static IRCU: &[(char, &str)] = &[
    ('d', "DEAF"),
    ('g', "DEBUG"),
    ('k', "SERVICE"),
    ('r', "REGISTERED"),
    ('s', "SERVER_NOTICES"),
    ('x', "HOST_HIDING"),
];

static KINE: &[(char, &str)] = &[
    ('d', "DEAF"),
    ('g', "CALLERID"),
    ('h', "HELPER"),
    ('R', "NO_NON_REGISTERED"),
    ('s', "SERVER_NOTICES"),
];

static UNREAL: &[(char, &str)] = &[
    ('a', "SERVICES_ADMIN"),
    ('A', "SERVER_ADMIN"),
    ('b', "CHATOPS"),
    ('B', "BOT"),
    ('C', "CO_ADMIN"),
    ('G', "STRIP_BAD_WORDS"),
    ('H', "HIDE_OPER"),
    ('I', "INVISIBLE_JOINPART"),
    ('N', "NETWORK_ADMIN"),
    ('p', "HIDE_CHANNELS"),
    ('q', "KIX"),
    ('R', "NO_NON_REGISTERED"),
    ('S', "SERVICE"),
    ('t', "MODIFIED_HOST"),
    ('T', "BLOCK_CTCP"),
    ('v', "VICTIM"),
    ('V', "WEBTV"),
    ('W', "WHOIS_PARANOIA"),
    ('x', "HOST_HIDING"),
    ('z', "SECURE_CONN"),
];

/// Pick the dictionary for a server version string as sent in `RPL_MYINFO`.
///
/// Matching is a case-insensitive substring test on well-known family
/// names, so `"Unreal3.2.10"` and `"hybrid-7.2.3"` both resolve.
pub fn table_for(ircd: &str) -> Option<&'static [(char, &'static str)]> {
    let ircd = ircd.to_ascii_lowercase();
    let families: [(&str, &'static [(char, &'static str)]); 7] = [
        ("austhex", AUSTHEX),
        ("bahamut", BAHAMUT),
        ("hybrid", HYBRID),
        ("kine", KINE),
        ("unreal", UNREAL),
        ("ircu", IRCU),
        ("u2.", IRCU),
    ];
    families
        .iter()
        .find(|(needle, _)| ircd.contains(needle))
        .map(|&(_, table)| table)
}

fn lookup(table: &[(char, &'static str)], mode: char) -> Option<&'static str> {
    table.iter().find(|&&(c, _)| c == mode).map(|&(_, name)| name)
}

/// Name of a user mode letter on the given daemon.
///
/// Letters the daemon's table does not know, and daemons with no table,
/// fall back to RFC 2812.
pub fn user_mode_name(ircd: Option<&str>, mode: char) -> Option<&'static str> {
    ircd.and_then(table_for)
        .and_then(|table| lookup(table, mode))
        .or_else(|| lookup(RFC2812, mode))
}
