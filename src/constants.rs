use std::time::Duration;

/// Name reported by adapters that could not resolve one
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// RSSI assigned to unmeasured records when ranking in the final pass
pub const MISSING_RSSI_SENTINEL: i16 = -100;

/// Default similarity threshold for fuzzy name comparison
pub const NAME_MATCH_THRESHOLD: f64 = 0.7;

/// Minimum length of a shared run of characters that counts as a name match
pub const MIN_COMMON_SUBSTRING: usize = 3;

/// Extra time an adapter gets on top of the scan duration before it is
/// considered timed out
pub const ADAPTER_GRACE: Duration = Duration::from_secs(2);

/// Bound on connecting to one device and reading its GATT table
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// At most this many devices are connected to once a scan finds more than
/// `CONNECTION_BUDGET_THRESHOLD` of them
pub const CONNECTION_BUDGET: usize = 5;
pub const CONNECTION_BUDGET_THRESHOLD: usize = 10;

/// Extra adapter time when connecting for details, one connection slot of
/// slack on top of the budget
pub const DETAILS_ALLOWANCE: Duration = Duration::from_secs(10 * (CONNECTION_BUDGET as u64 + 1));

/// Filter values that callers use to mean "no filter"
pub const NO_FILTER_SENTINELS: &[&str] = &["", "null", "none", "string"];

/// GATT profile services that rarely collide between unrelated devices within
/// one scan window. Sharing one of these is treated as identity evidence.
pub const SIGNIFICANT_SERVICE_UUIDS: &[&str] = &[
    "0000180f-0000-1000-8000-00805f9b34fb", // Battery Service
    "00001800-0000-1000-8000-00805f9b34fb", // Generic Access
    "00001801-0000-1000-8000-00805f9b34fb", // Generic Attribute
    "0000180a-0000-1000-8000-00805f9b34fb", // Device Information
    "0000180d-0000-1000-8000-00805f9b34fb", // Heart Rate
    "00001803-0000-1000-8000-00805f9b34fb", // Link Loss
    "00001805-0000-1000-8000-00805f9b34fb", // Current Time
    "00001812-0000-1000-8000-00805f9b34fb", // Human Interface Device
    "00001813-0000-1000-8000-00805f9b34fb", // Scan Parameters
    "00001819-0000-1000-8000-00805f9b34fb", // Location and Navigation
];

/// Assigned names of common GATT services and characteristics, keyed by
/// their 16-bit short UUID
pub const GATT_DESCRIPTIONS: &[(u16, &str)] = &[
    (0x1800, "Generic Access Profile"),
    (0x1801, "Generic Attribute Profile"),
    (0x1802, "Immediate Alert"),
    (0x1803, "Link Loss"),
    (0x1804, "Tx Power"),
    (0x1805, "Current Time Service"),
    (0x180a, "Device Information"),
    (0x180d, "Heart Rate"),
    (0x180f, "Battery Service"),
    (0x1812, "Human Interface Device"),
    (0x1813, "Scan Parameters"),
    (0x1819, "Location and Navigation"),
    (0x2a00, "Device Name"),
    (0x2a01, "Appearance"),
    (0x2a04, "Peripheral Preferred Connection Parameters"),
    (0x2a05, "Service Changed"),
    (0x2a19, "Battery Level"),
    (0x2a24, "Model Number String"),
    (0x2a25, "Serial Number String"),
    (0x2a26, "Firmware Revision String"),
    (0x2a27, "Hardware Revision String"),
    (0x2a28, "Software Revision String"),
    (0x2a29, "Manufacturer Name String"),
    (0x2a37, "Heart Rate Measurement"),
    (0x2a4d, "Report"),
    (0x2a50, "PnP ID"),
];

/// Major device classes of the classic Bluetooth Class of Device field
pub const MAJOR_DEVICE_CLASSES: &[(u32, &str)] = &[
    (0, "Miscellaneous"),
    (1, "Computer"),
    (2, "Phone"),
    (3, "LAN/Network Access Point"),
    (4, "Audio/Video"),
    (5, "Peripheral"),
    (6, "Imaging"),
    (7, "Wearable"),
    (8, "Toy"),
    (9, "Health"),
    (31, "Uncategorized"),
];

/// Service class bits (13..=23 of the Class of Device field, shifted down)
pub const SERVICE_CLASSES: &[(u32, &str)] = &[
    (0, "Limited Discoverable Mode"),
    (1, "Reserved"),
    (2, "Reserved"),
    (3, "Positioning"),
    (4, "Networking"),
    (5, "Rendering"),
    (6, "Capturing"),
    (7, "Object Transfer"),
    (8, "Audio"),
    (9, "Telephony"),
    (10, "Information"),
];

/// Built-in OUI (Organizationally Unique Identifier) database
/// This serves as a fallback when the external manuf.txt file is not available
pub const BUILTIN_OUI: &str = r#"
00:00:5E   IANA
00:02:5B   Cambridge Silicon Radio
00:1A:7D   cyber-blue(HK)Ltd
00:1B:DC   Vencer Co., Ltd.
00:25:DB   ATI Electronics(Shenzhen) Co., LTD
00:17:F2   Apple, Inc.
00:1C:B3   Apple, Inc.
00:26:BB   Apple, Inc.
AC:BC:32   Apple, Inc.
D8:27:27   Samsung Electronics Co.,Ltd
B8:27:EB   Raspberry Pi Foundation
DC:A6:32   Raspberry Pi Trading Ltd
00:0F:FE   Intel Corporate
00:18:8B   Microsoft Corporation
00:22:48   Microsoft Corporation
00:50:F2   Microsoft Corporation
00:1D:D8   Microsoft Corporation
00:1B:66   Sennheiser electronic GmbH & Co. KG
00:0C:8A   Bose Corporation
04:52:C7   Bose Corporation
2C:41:A1   Bose Corporation
00:23:4D   Hon Hai Precision Ind. Co.,Ltd.
E0:D4:E8   Intel Corporate
F0:99:B6   Apple, Inc.
C8:2B:96   Espressif Inc.
24:0A:C4   Espressif Inc.
"#;

/// Registered MAC address prefixes: (prefix, company, device type, model, friendly name)
pub const MAC_PREFIXES: &[(&str, &str, &str, &str, &str)] = &[
    ("14:0C:76", "Freebox SA", "Freebox", "Freebox Player", "Freebox Player"),
    ("E4:F0:42", "Freebox SA", "Freebox", "Freebox Revolution", "Freebox Revolution"),
    ("DC:F5:05", "Freebox SA", "Freebox", "Freebox Delta", "Freebox Delta"),
    ("38:17:E3", "Freebox SA", "Freebox", "Freebox Mini 4K", "Freebox Mini 4K"),
    ("F4:CA:E5", "Freebox SA", "Freebox", "Freebox Player Mini", "Freebox Player Mini"),
    ("54:B8:0A", "Freebox SA", "Freebox", "Freebox Pop", "Freebox Pop"),
    ("00:07:CB", "FREEBOX SA", "Freebox", "Freebox", "Freebox"),
    ("00:24:D4", "FREEBOX SAS", "Freebox", "Freebox", "Freebox"),
    ("70:FC:8F", "Freebox SA", "Freebox", "Freebox Server", "Freebox Server"),
    ("14:A7:2B", "Freebox SA", "Freebox", "Freebox Server Mini", "Freebox Server Mini"),
    ("00:03:93", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:0A:27", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:0A:95", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:0D:93", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:10:FA", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:11:24", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:14:51", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:16:CB", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:17:F2", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:19:E3", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1C:B3", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1D:4F", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1E:52", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1E:C2", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1F:5B", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:1F:F3", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:21:E9", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:22:41", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:23:12", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:23:32", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:23:6C", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:23:DF", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:24:36", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:25:00", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:25:4B", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:25:BC", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:26:08", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:26:4A", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:26:B0", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:26:BB", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:30:65", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("00:3E:E1", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:0C:CE", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:15:52", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:1E:64", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:26:65", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:48:9A", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:4B:ED", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:52:F7", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:54:53", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:69:F8", "Apple, Inc.", "Mobile", "iPhone", "iPhone"),
    ("04:D3:CF", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:E5:36", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:F1:3E", "Apple, Inc.", "Computer", "Mac", "Mac"),
    ("04:F7:E4", "Apple, Inc.", "Audio", "AirPods", "AirPods"),
    ("00:1A:8A", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("00:21:19", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("00:23:39", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("00:25:67", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("00:E0:64", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("08:08:C2", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("14:49:E0", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("14:7D:DA", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("14:89:FD", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("14:9F:3C", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("14:A3:64", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("1C:3A:DE", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("1C:62:B8", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("1C:66:AA", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("1C:AF:05", "Samsung Electronics Co.,Ltd", "Mobile", "Galaxy", "Samsung Galaxy"),
    ("00:1A:11", "Google, Inc.", "Smart Home", "Home", "Google Home"),
    ("08:9E:08", "Google, Inc.", "Smart Home", "Chromecast", "Google Chromecast"),
    ("20:DF:B9", "Google, Inc.", "Smart Home", "Home", "Google Home"),
    ("3C:5A:B4", "Google, Inc.", "Smart Home", "Chromecast", "Google Chromecast"),
    ("54:60:09", "Google, Inc.", "Mobile", "Pixel", "Google Pixel"),
    ("94:95:A0", "Google, Inc.", "Mobile", "Pixel", "Google Pixel"),
    ("F4:F5:D8", "Google, Inc.", "Smart Home", "Chromecast", "Google Chromecast"),
    ("F4:F5:E8", "Google, Inc.", "Smart Home", "Chromecast", "Google Chromecast"),
    ("F8:8F:CA", "Google, Inc.", "Smart Home", "Chromecast", "Google Chromecast"),
    ("00:01:4A", "Sony Corporation", "Audio", "Unknown", "Sony Device"),
    ("00:24:BE", "Sony Corporation", "Audio", "Unknown", "Sony Device"),
    ("30:F9:ED", "Sony Corporation", "Audio", "WH-1000XM", "Sony Headphones"),
    ("40:2B:A1", "Sony Corporation", "Audio", "WH-1000XM", "Sony Headphones"),
    ("58:48:22", "Sony Corporation", "Audio", "WH-1000XM", "Sony Headphones"),
    ("D8:D4:3C", "Sony Corporation", "Audio", "WH-1000XM", "Sony Headphones"),
    ("00:15:5D", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("28:18:78", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("3C:A3:15", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("58:82:A8", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("60:45:BD", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("7C:1E:52", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("7C:ED:8D", "Microsoft Corporation", "Computer", "Surface", "Microsoft Surface"),
    ("00:EC:0A", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("0C:1D:AF", "Xiaomi Communications Co Ltd", "Mobile", "Redmi", "Xiaomi Redmi"),
    ("10:2A:B3", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("14:F6:5A", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("18:59:36", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("20:A7:83", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("28:6C:07", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("28:E3:1F", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("3C:BD:D8", "Xiaomi Communications Co Ltd", "Mobile", "Mi", "Xiaomi Mi"),
    ("40:31:3C", "Xiaomi Communications Co Ltd", "Mobile", "Redmi", "Xiaomi Redmi"),
    ("00:02:EE", "Nokia Denmark A/S", "Audio", "Bluetooth Audio", "Nokia Audio"),
    ("00:09:A7", "Bang & Olufsen A/S", "Audio", "Beoplay", "B&O Beoplay"),
    ("00:0D:3C", "i.Tech Dynamic Ltd", "Audio", "Bluetooth Audio", "i.Tech Audio"),
    ("00:0E:9F", "Temic SDS GmbH", "Audio", "Car Audio", "Vehicle Audio System"),
    ("00:11:67", "Integrated System Solution Corp.", "Audio", "Bluetooth Audio", "ISSC Audio"),
    ("00:12:A1", "BlueRadios, Inc.", "Audio", "Bluetooth Audio", "BlueRadios Audio"),
    ("00:13:17", "GN Netcom A/S", "Audio", "Jabra", "Jabra Headset"),
    ("00:14:A4", "Motorola Mobility, Inc.", "Audio", "Headset", "Motorola Headset"),
    ("00:16:94", "Sennheiser Communications A/S", "Audio", "Headset", "Sennheiser Headset"),
    ("00:17:00", "Kobe Steel, Ltd.", "Audio", "Bluetooth Audio", "Bluetooth Audio"),
    ("00:18:09", "CRESYN", "Audio", "Bluetooth Audio", "CRESYN Audio"),
    ("00:18:91", "Zhongshan General K-mate Electronics Co., Ltd", "Audio", "Bluetooth Audio", "K-mate Audio"),
    ("00:19:1D", "Nintendo Co.,Ltd.", "Gaming", "Nintendo Switch", "Nintendo Switch"),
];

/// Bluetooth SIG company identifiers seen in manufacturer-specific advertising data
pub const COMPANY_IDENTIFIERS: &[(u16, &str)] = &[
    (0x004C, "Apple, Inc."),
    (0x0006, "Microsoft"),
    (0x000F, "Broadcom Corporation"),
    (0x0075, "Samsung Electronics Co. Ltd."),
    (0x0001, "Ericsson Technology Licensing"),
    (0x00E0, "Google Inc."),
    (0x008A, "Bose Corporation"),
    (0x000A, "Nokia"),
    (0x00D2, "Seiko Epson Corporation"),
    (0x004D, "Motorola Mobility LLC"),
    (0x0002, "Intel Corp."),
    (0x00E8, "Fitbit, Inc."),
    (0x00D7, "Continental Automotive Systems"),
    (0x00D6, "Hewlett-Packard Company"),
    (0x0197, "Huawei Technologies Co., Ltd."),
    (0x038F, "XIAOMI Inc."),
    (0x0499, "Ruuvi Innovations Ltd."),
    (0x0157, "Anhui Huami Information Technology Co., Ltd."),
    (0x0030, "ST Microelectronics"),
    (0x0059, "Nordic Semiconductor ASA"),
    (0x0131, "Cypress Semiconductor"),
    (0x02D5, "Spotify AB"),
    (0x0047, "Plantronics, Inc."),
    (0x0078, "Sony Corporation"),
    (0x0301, "Sony Mobile Communications Inc."),
    (0x0080, "Toshiba Corporation"),
    (0x0046, "Bang & Olufsen A/S"),
    (0x01D7, "Jabra"),
    (0x00C6, "Beats Electronics, LLC"),
    (0x0310, "Realtek Semiconductor Corp."),
    (0x004E, "Razer Inc."),
    (0x0177, "Jaybird LLC"),
    (0x0126, "SOL REPUBLIC"),
    (0x0362, "HARMAN International Industries, Inc."),
    (0x0111, "Logitech International SA"),
    (0x00F0, "JVCKENWOOD Corporation"),
    (0x0186, "Signify Netherlands B.V. (formerly Philips Lighting B.V.)"),
    (0x0057, "Garmin International, Inc."),
    (0x029F, "Tile, Inc."),
    (0x0107, "Belkin International, Inc."),
    (0x000B, "Sonos Inc."),
    (0x01D9, "Flic"),
    (0x05D7, "LEDVANCE GmbH"),
    (0x0276, "IKEA of Sweden AB"),
    (0x026A, "Ilumi Solutions Inc."),
    (0x025A, "Roku, Inc."),
    (0x0154, "Nintendo Co., Ltd."),
    (0x0012, "Sony Interactive Entertainment Inc."),
    (0x01A4, "Valve Corporation"),
    (0x0036, "TomTom International BV"),
    (0x00E9, "Visteon Corporation"),
    (0x01E5, "Parrot SA"),
    (0x019A, "Arcadyan Corporation"),
    (0x012A, "INGENICO"),
    (0x0060, "SiRF Technology, Inc."),
    (0x3213, "FREEBOX SAS"),
    (0x07CB, "FREEBOX SA"),
    (0x24D4, "FREEBOX SAS"),
    (0x01FF, "Facebook, Inc."),
    (0x00F2, "Ubiquitous Computing Technology Corporation"),
    (0x0560, "Withings"),
    (0x013E, "Nod, Inc."),
    (0x0052, "Tesla, Inc."),
    (0x021A, "Bookie Corporation"),
    (0x034C, "GoPro, Inc."),
    (0x02C4, "Procter & Gamble"),
    (0x0188, "Clover Network, Inc."),
    (0x0500, "Wiliot LTD."),
    (0x02CA, "Dyson Technology Limited"),
    (0x0201, "Polar Electro Oy"),
    (0x0352, "Snapchat Inc"),
    (0x0387, "ESET, spol. s r.o."),
    (0x0225, "Nestlé Nespresso S.A."),
    (0x03DA, "CRESCO Wireless, Inc"),
    (0x02A9, "Sonova AG"),
    (0x0626, "Audio-Technica Corporation"),
    (0x0520, "OPPO Electronics Co., Ltd."),
    (0x06D6, "Instacart"),
    (0x0529, "Honor Device Co., Ltd."),
    (0x0602, "OnePlus Technology (Shenzhen) Co., Ltd"),
    (0x0614, "DJI Innovations"),
    (0x0717, "Canon Inc."),
    (0x0822, "Skullcandy Inc."),
    (0x0831, "Sennheiser electronic GmbH & Co. KG"),
];
