use std::net::Ipv4Addr;

/// Mappings served when no domain table file exists.
pub const DEFAULT_ENTRIES: [(&str, Ipv4Addr); 12] = [
    ("*.dnas.playstation.org", Ipv4Addr::new(34, 75, 107, 68)),
    ("*.kddi-mmbb.jp", Ipv4Addr::new(151, 80, 238, 101)),
    ("corsair.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("skyhawk.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("viper.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("crusader.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("raptor.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("strike-raptor.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 99)),
    ("goshawk.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 104)),
    ("spector.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 104)),
    ("meteor.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 104)),
    ("voodoo.capcom.co.jp", Ipv4Addr::new(151, 80, 238, 104)),
];
