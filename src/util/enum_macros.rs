/// Generates a BACnet enumeration whose wire values outside the named set
/// survive a parse/serialize round trip.
///
/// BACnet reserves part of most enumerations for vendor-proprietary values
/// (object types 128..=1023, property identifiers 512..=4194303, ...). A value
/// inside `$custom_range` that is not named becomes `Custom`, any other
/// unnamed value becomes `Reserved`. Either way the raw value is kept, so
/// converting back yields the original number.
///
/// # Arguments
///
/// * `$name:ident` - The name of the enum to be generated.
/// * `$variant:ident = $value:expr` - Named variants and their wire values.
/// * `$unit:ident` - The underlying integer type (`u8`, `u16`, `u32`).
/// * `$custom_range:expr` - The vendor-proprietary range. Omit it for
///   enumerations without one; every unnamed value is then `Reserved`.
///
/// # Example
///
/// ```rust
/// use bacnet_codec::generate_custom_enum;
///
/// generate_custom_enum! {
///     Fan {
///         Off = 0,
///         Low = 1,
///         High = 2,
///     },
///     u32,
///     64..=255
/// }
///
/// assert_eq!(Fan::from(2u32), Fan::High);
/// assert!(Fan::from(100u32).is_custom());
/// assert!(matches!(Fan::from(300u32), Fan::Reserved(_)));
/// assert_eq!(u32::from(Fan::from(300u32)), 300);
/// assert_eq!(Fan::Low.to_string(), "Low");
/// ```
///
/// The generated enum derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and
/// `Hash`, implements `Display` and both `From` conversions, and derives the
/// serde traits when the `serde` feature is enabled.
#[macro_export]
macro_rules! generate_custom_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident = $value:expr,)+ }, $unit:ident) => {
        $crate::generate_custom_enum! {
            $(#[$doc])* $name { $($variant = $value,)+ }, $unit, $unit::MAX..$unit::MAX
        }
    };
    ($(#[$doc:meta])* $name:ident { $($variant:ident = $value:expr,)+ }, $unit:ident, $custom_range:expr) => {
        pastey::paste! {
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub enum $name {
                $($variant,)*
                Custom( [<$name Value>] ),
                Reserved( [<$name Value>] ),
            }

            #[doc = concat!("Raw wire value of an unnamed [`", stringify!($name), "`]")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct [<$name Value>] { value: $unit }

            impl [<$name Value>] {
                fn new(value: $unit) -> Self {
                    Self { value }
                }

                pub fn value(&self) -> $unit {
                    self.value
                }
            }

            impl $name {
                /// Whether this is a vendor-proprietary value
                pub fn is_custom(&self) -> bool {
                    matches!(self, $name::Custom(_))
                }

                /// Whether this value has a name in this enumeration
                pub fn is_known(&self) -> bool {
                    !matches!(self, $name::Custom(_) | $name::Reserved(_))
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match self {
                        $($name::$variant => write!(f, "{}", stringify!($variant)),)*
                        $name::Custom( value ) => write!(f, "Custom({})", value.value()),
                        $name::Reserved( value ) => write!(f, "Reserved({})", value.value()),
                    }
                }
            }

            impl From<$name> for $unit {
                fn from(value: $name) -> Self {
                    match value {
                        $($name::$variant => $value,)*
                        $name::Custom( value ) => value.value(),
                        $name::Reserved( value ) => value.value(),
                    }
                }
            }

            impl From<$unit> for $name {
                fn from(value: $unit) -> Self {
                    match value {
                        $($value => $name::$variant,)*
                        v if ($custom_range).contains(&v) => {
                            $name::Custom( [<$name Value>]::new(v) )
                        }
                        v => $name::Reserved( [<$name Value>]::new(v) ),
                    }
                }
            }
        }
    };
}
