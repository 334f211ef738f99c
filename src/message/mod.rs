#![doc = r#"
Status bytes the codec understands

```text
0x80..=0xEF   channel messages, see [`channel`]
0xF0, 0xF7    system exclusive, length prefixed
0xFF          meta event, type byte then length prefixed
```
"#]

pub mod channel;

mod meta;
pub use meta::*;

/// Status byte opening a meta event
pub const META: u8 = 0xFF;
/// Status byte opening a system exclusive message
pub const SYSEX: u8 = 0xF0;
/// Status byte opening a system exclusive continuation ("escape")
pub const SYSEX_ESCAPE: u8 = 0xF7;
