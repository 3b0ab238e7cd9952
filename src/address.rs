//! Target address parsing and /24 block derivation
//!
//! Addresses are scanned the way `%d.%d.%d.%d` would scan them: each number
//! may be preceded by whitespace and a `+` sign, the dots must follow the
//! numbers directly, and anything after the fourth number is ignored.
//! Components are not range checked.

use crate::error::{Error, Result};
use nom::{
    character::complete::{char, digit1, multispace0},
    combinator::{map_res, opt},
    sequence::preceded,
    Parser,
};
use std::fmt;

/// Address used when none is given on the command line or in the config
pub const DEFAULT_ADDRESS: &str = "192.168.222.222";

/// Prefix length of every managed subnet
pub const PREFIX_LEN: u8 = 24;

/// Four integer components in dotted-decimal notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DottedQuad([u32; 4]);

impl DottedQuad {
    pub fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self([a, b, c, d])
    }

    /// Scan a dotted quad from the start of `input`
    pub fn parse(input: &str) -> Result<Self> {
        match dotted_quad(input) {
            Ok((_, octets)) => Ok(Self(octets)),
            Err(_) => Err(Error::MalformedAddress(input.to_string())),
        }
    }

    pub fn octets(&self) -> [u32; 4] {
        self.0
    }

    /// Same first three components, different host component
    pub fn with_host(self, host: u32) -> Self {
        let [a, b, c, _] = self.0;
        Self::new(a, b, c, host)
    }

    /// True when every component fits an IPv4 octet
    pub fn is_strict(&self) -> bool {
        self.0.iter().all(|&o| o <= 255)
    }

    /// Render as `a.b.c.d/24`
    pub fn with_prefix(&self) -> String {
        format!("{}/{}", self, PREFIX_LEN)
    }
}

impl fmt::Display for DottedQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Target address together with the /24 block it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedBlock {
    /// Address the guest should end up holding
    pub address: DottedQuad,
    /// Network address (host component 0)
    pub network: DottedQuad,
    /// Gateway address (host component 1)
    pub gateway: DottedQuad,
}

impl DerivedBlock {
    pub fn derive(address: DottedQuad) -> Self {
        Self {
            address,
            network: address.with_host(0),
            gateway: address.with_host(1),
        }
    }

    /// Parse `input`, falling back to `default` when it is empty
    pub fn resolve(input: &str, default: &str) -> Result<Self> {
        let text = if input.trim().is_empty() { default } else { input };
        let address = DottedQuad::parse(text)?;

        if !address.is_strict() {
            tracing::warn!(%address, "address has components above 255, using it unchanged");
        }

        Ok(Self::derive(address))
    }

    /// Subnet prefix handed to the host, e.g. `10.0.5.0/24`
    pub fn subnet_prefix(&self) -> String {
        self.network.with_prefix()
    }

    /// Alias assigned inside the guest, e.g. `10.0.5.7/24`
    pub fn alias_cidr(&self) -> String {
        self.address.with_prefix()
    }
}

// Nom parsers

fn number(input: &str) -> nom::IResult<&str, u32> {
    preceded(
        (multispace0, opt(char('+'))),
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
    )
    .parse(input)
}

fn dotted_quad(input: &str) -> nom::IResult<&str, [u32; 4]> {
    let (input, a) = number(input)?;
    let (input, b) = preceded(char('.'), number).parse(input)?;
    let (input, c) = preceded(char('.'), number).parse(input)?;
    let (input, d) = preceded(char('.'), number).parse(input)?;

    Ok((input, [a, b, c, d]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_block() {
        let block = DerivedBlock::resolve("10.0.5.7", DEFAULT_ADDRESS).unwrap();
        assert_eq!(block.address.to_string(), "10.0.5.7");
        assert_eq!(block.network.to_string(), "10.0.5.0");
        assert_eq!(block.gateway.to_string(), "10.0.5.1");
        assert_eq!(block.subnet_prefix(), "10.0.5.0/24");
        assert_eq!(block.alias_cidr(), "10.0.5.7/24");
    }

    #[test]
    fn test_empty_input_uses_default() {
        for input in ["", "   "] {
            let block = DerivedBlock::resolve(input, DEFAULT_ADDRESS).unwrap();
            assert_eq!(block.address.to_string(), "192.168.222.222");
            assert_eq!(block.network.to_string(), "192.168.222.0");
            assert_eq!(block.gateway.to_string(), "192.168.222.1");
        }
    }

    #[test]
    fn test_gateway_follows_network() {
        for input in ["1.2.3.4", "172.16.40.200", "10.10.10.0", "192.168.0.255"] {
            let block = DerivedBlock::resolve(input, DEFAULT_ADDRESS).unwrap();
            let [a, b, c, _] = block.address.octets();
            assert_eq!(block.network.octets(), [a, b, c, 0]);
            assert_eq!(block.gateway.octets(), [a, b, c, 1]);
        }
    }

    #[test]
    fn test_too_few_components() {
        for input in ["10.0.5", "10", "10.0.", "abc", "10.0.x.7", ".1.2.3"] {
            let err = DottedQuad::parse(input).unwrap_err();
            assert!(matches!(err, Error::MalformedAddress(_)), "{input}");
        }
    }

    #[test]
    fn test_scanf_leniency() {
        // Leading whitespace and '+' before numbers are accepted
        assert_eq!(
            DottedQuad::parse(" 10. +0.5. 7").unwrap(),
            DottedQuad::new(10, 0, 5, 7)
        );
        // Trailing text after the fourth number is ignored
        assert_eq!(
            DottedQuad::parse("10.0.5.7/24").unwrap(),
            DottedQuad::new(10, 0, 5, 7)
        );
        assert_eq!(
            DottedQuad::parse("1.2.3.4.5").unwrap(),
            DottedQuad::new(1, 2, 3, 4)
        );
        // Whitespace before a dot is not skipped
        assert!(DottedQuad::parse("10 .0.5.7").is_err());
    }

    #[test]
    fn test_components_not_range_checked() {
        let quad = DottedQuad::parse("300.1.2.999").unwrap();
        assert_eq!(quad.octets(), [300, 1, 2, 999]);
        assert!(!quad.is_strict());

        let block = DerivedBlock::derive(quad);
        assert_eq!(block.network.to_string(), "300.1.2.0");
    }

    #[test]
    fn test_negative_and_overflowing_components() {
        assert!(DottedQuad::parse("-1.2.3.4").is_err());
        assert!(DottedQuad::parse("1.2.3.99999999999").is_err());
    }

    #[test]
    fn test_custom_default() {
        let block = DerivedBlock::resolve("", "172.20.1.50").unwrap();
        assert_eq!(block.network.to_string(), "172.20.1.0");
    }
}
