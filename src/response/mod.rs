//! Numeric reply names.
//!
//! A static, read-only table mapping three-digit reply codes to their
//! symbolic names as used by RFC 1459/2812 and the IRCv3 SASL extension.
//! The session consults it once per numeric message so that handlers can
//! subscribe to `rpl_welcome` instead of `001`.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

/// `(code, name)` pairs, sorted by code.
static REPLIES: &[(u16, &str)] = &[
    (1, "RPL_WELCOME"),
    (2, "RPL_YOURHOST"),
    (3, "RPL_CREATED"),
    (4, "RPL_MYINFO"),
    (5, "RPL_ISUPPORT"),
    (10, "RPL_BOUNCE"),
    (42, "RPL_YOURID"),
    (200, "RPL_TRACELINK"),
    (201, "RPL_TRACECONNECTING"),
    (202, "RPL_TRACEHANDSHAKE"),
    (203, "RPL_TRACEUNKNOWN"),
    (204, "RPL_TRACEOPERATOR"),
    (205, "RPL_TRACEUSER"),
    (206, "RPL_TRACESERVER"),
    (207, "RPL_TRACESERVICE"),
    (208, "RPL_TRACENEWTYPE"),
    (209, "RPL_TRACECLASS"),
    (210, "RPL_TRACERECONNECT"),
    (211, "RPL_STATSLINKINFO"),
    (212, "RPL_STATSCOMMANDS"),
    (219, "RPL_ENDOFSTATS"),
    (221, "RPL_UMODEIS"),
    (234, "RPL_SERVLIST"),
    (235, "RPL_SERVLISTEND"),
    (242, "RPL_STATSUPTIME"),
    (243, "RPL_STATSOLINE"),
    (251, "RPL_LUSERCLIENT"),
    (252, "RPL_LUSEROP"),
    (253, "RPL_LUSERUNKNOWN"),
    (254, "RPL_LUSERCHANNELS"),
    (255, "RPL_LUSERME"),
    (256, "RPL_ADMINME"),
    (257, "RPL_ADMINLOC1"),
    (258, "RPL_ADMINLOC2"),
    (259, "RPL_ADMINEMAIL"),
    (261, "RPL_TRACELOG"),
    (262, "RPL_TRACEEND"),
    (263, "RPL_TRYAGAIN"),
    (265, "RPL_LOCALUSERS"),
    (266, "RPL_GLOBALUSERS"),
    (276, "RPL_WHOISCERTFP"),
    (300, "RPL_NONE"),
    (301, "RPL_AWAY"),
    (302, "RPL_USERHOST"),
    (303, "RPL_ISON"),
    (305, "RPL_UNAWAY"),
    (306, "RPL_NOWAWAY"),
    (311, "RPL_WHOISUSER"),
    (312, "RPL_WHOISSERVER"),
    (313, "RPL_WHOISOPERATOR"),
    (314, "RPL_WHOWASUSER"),
    (315, "RPL_ENDOFWHO"),
    (317, "RPL_WHOISIDLE"),
    (318, "RPL_ENDOFWHOIS"),
    (319, "RPL_WHOISCHANNELS"),
    (321, "RPL_LISTSTART"),
    (322, "RPL_LIST"),
    (323, "RPL_LISTEND"),
    (324, "RPL_CHANNELMODEIS"),
    (325, "RPL_UNIQOPIS"),
    (329, "RPL_CREATIONTIME"),
    (330, "RPL_WHOISACCOUNT"),
    (331, "RPL_NOTOPIC"),
    (332, "RPL_TOPIC"),
    (333, "RPL_TOPICWHOTIME"),
    (341, "RPL_INVITING"),
    (342, "RPL_SUMMONING"),
    (346, "RPL_INVITELIST"),
    (347, "RPL_ENDOFINVITELIST"),
    (348, "RPL_EXCEPTLIST"),
    (349, "RPL_ENDOFEXCEPTLIST"),
    (351, "RPL_VERSION"),
    (352, "RPL_WHOREPLY"),
    (353, "RPL_NAMREPLY"),
    (364, "RPL_LINKS"),
    (365, "RPL_ENDOFLINKS"),
    (366, "RPL_ENDOFNAMES"),
    (367, "RPL_BANLIST"),
    (368, "RPL_ENDOFBANLIST"),
    (369, "RPL_ENDOFWHOWAS"),
    (371, "RPL_INFO"),
    (372, "RPL_MOTD"),
    (374, "RPL_ENDOFINFO"),
    (375, "RPL_MOTDSTART"),
    (376, "RPL_ENDOFMOTD"),
    (381, "RPL_YOUREOPER"),
    (382, "RPL_REHASHING"),
    (383, "RPL_YOURESERVICE"),
    (391, "RPL_TIME"),
    (392, "RPL_USERSSTART"),
    (393, "RPL_USERS"),
    (394, "RPL_ENDOFUSERS"),
    (395, "RPL_NOUSERS"),
    (396, "RPL_HOSTHIDDEN"),
    (401, "ERR_NOSUCHNICK"),
    (402, "ERR_NOSUCHSERVER"),
    (403, "ERR_NOSUCHCHANNEL"),
    (404, "ERR_CANNOTSENDTOCHAN"),
    (405, "ERR_TOOMANYCHANNELS"),
    (406, "ERR_WASNOSUCHNICK"),
    (407, "ERR_TOOMANYTARGETS"),
    (408, "ERR_NOSUCHSERVICE"),
    (409, "ERR_NOORIGIN"),
    (411, "ERR_NORECIPIENT"),
    (412, "ERR_NOTEXTTOSEND"),
    (413, "ERR_NOTOPLEVEL"),
    (414, "ERR_WILDTOPLEVEL"),
    (415, "ERR_BADMASK"),
    (417, "ERR_INPUTTOOLONG"),
    (421, "ERR_UNKNOWNCOMMAND"),
    (422, "ERR_NOMOTD"),
    (423, "ERR_NOADMININFO"),
    (424, "ERR_FILEERROR"),
    (431, "ERR_NONICKNAMEGIVEN"),
    (432, "ERR_ERRONEUSNICKNAME"),
    (433, "ERR_NICKNAMEINUSE"),
    (436, "ERR_NICKCOLLISION"),
    (437, "ERR_UNAVAILRESOURCE"),
    (441, "ERR_USERNOTINCHANNEL"),
    (442, "ERR_NOTONCHANNEL"),
    (443, "ERR_USERONCHANNEL"),
    (444, "ERR_NOLOGIN"),
    (445, "ERR_SUMMONDISABLED"),
    (446, "ERR_USERSDISABLED"),
    (451, "ERR_NOTREGISTERED"),
    (461, "ERR_NEEDMOREPARAMS"),
    (462, "ERR_ALREADYREGISTRED"),
    (463, "ERR_NOPERMFORHOST"),
    (464, "ERR_PASSWDMISMATCH"),
    (465, "ERR_YOUREBANNEDCREEP"),
    (466, "ERR_YOUWILLBEBANNED"),
    (467, "ERR_KEYSET"),
    (471, "ERR_CHANNELISFULL"),
    (472, "ERR_UNKNOWNMODE"),
    (473, "ERR_INVITEONLYCHAN"),
    (474, "ERR_BANNEDFROMCHAN"),
    (475, "ERR_BADCHANNELKEY"),
    (476, "ERR_BADCHANMASK"),
    (477, "ERR_NOCHANMODES"),
    (478, "ERR_BANLISTFULL"),
    (481, "ERR_NOPRIVILEGES"),
    (482, "ERR_CHANOPRIVSNEEDED"),
    (483, "ERR_CANTKILLSERVER"),
    (484, "ERR_RESTRICTED"),
    (485, "ERR_UNIQOPPRIVSNEEDED"),
    (491, "ERR_NOOPERHOST"),
    (501, "ERR_UMODEUNKNOWNFLAG"),
    (502, "ERR_USERSDONTMATCH"),
    (670, "RPL_STARTTLS"),
    (671, "RPL_WHOISSECURE"),
    (691, "ERR_STARTTLS"),
    (730, "RPL_MONONLINE"),
    (731, "RPL_MONOFFLINE"),
    (732, "RPL_MONLIST"),
    (733, "RPL_ENDOFMONLIST"),
    (734, "ERR_MONLISTFULL"),
    (900, "RPL_LOGGEDIN"),
    (901, "RPL_LOGGEDOUT"),
    (902, "ERR_NICKLOCKED"),
    (903, "RPL_SASLSUCCESS"),
    (904, "ERR_SASLFAIL"),
    (905, "ERR_SASLTOOLONG"),
    (906, "ERR_SASLABORTED"),
    (907, "ERR_SASLALREADY"),
    (908, "RPL_SASLMECHS"),
];

/// Symbolic name for a numeric reply code such as `"001"`.
///
/// Returns `None` for non-numeric commands and for unmapped codes.
pub fn reply_name(command: &str) -> Option<&'static str> {
    if command.len() != 3 || !command.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code: u16 = command.parse().ok()?;
    REPLIES
        .binary_search_by_key(&code, |&(c, _)| c)
        .ok()
        .map(|i| REPLIES[i].1)
}

/// Numeric code for a symbolic reply name (case-insensitive).
pub fn reply_code(name: &str) -> Option<u16> {
    REPLIES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|&(c, _)| c)
}

/// The lowercase event name a message with this command is dispatched under.
///
/// Mapped numerics become their symbolic name; anything else is
/// lowercased as-is, so an unknown `"999"` stays `"999"`.
pub fn event_name(command: &str) -> String {
    reply_name(command).unwrap_or(command).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(REPLIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_reply_name() {
        assert_eq!(reply_name("001"), Some("RPL_WELCOME"));
        assert_eq!(reply_name("433"), Some("ERR_NICKNAMEINUSE"));
        assert_eq!(reply_name("903"), Some("RPL_SASLSUCCESS"));
        assert_eq!(reply_name("999"), None);
        assert_eq!(reply_name("PRIVMSG"), None);
        assert_eq!(reply_name("1"), None);
    }

    #[test]
    fn test_reply_code() {
        assert_eq!(reply_code("RPL_BOUNCE"), Some(10));
        assert_eq!(reply_code("rpl_welcome"), Some(1));
        assert_eq!(reply_code("NOPE"), None);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("001"), "rpl_welcome");
        assert_eq!(event_name("PRIVMSG"), "privmsg");
        assert_eq!(event_name("999"), "999");
    }
}
