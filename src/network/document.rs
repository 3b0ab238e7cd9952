//! Typed HCN network configuration document
//!
//! Serialized to the JSON accepted by `HcnCreateNetwork`. Only the
//! network and gateway addresses vary between runs.

use crate::address::DerivedBlock;
use crate::error::Result;
use bitflags::bitflags;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Subnet object ID inside the network document
const SUBNET_ID: Uuid = Uuid::from_u128(0xFC437E99_2063_4433_A1FA_F4D17BD55C92);

/// IP subnet object ID inside the subnet
const IP_SUBNET_ID: Uuid = Uuid::from_u128(0x4D120505_4222_4CB2_8C53_DC0F70049696);

const SUBNET_OBJECT_TYPE: u32 = 5;
const IP_SUBNET_OBJECT_TYPE: u32 = 6;

const MAC_POOL_START: &str = "00-15-5D-52-C0-00";
const MAC_POOL_END: &str = "00-15-5D-52-C0-FF";

bitflags! {
    /// Network-level flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NetworkFlags: u32 {
        const ENABLE_DNS_PROXY = 0x01;
        const ISOLATE_VSWITCH = 0x08;
    }
}

bitflags! {
    /// Flags on an IP subnet
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IpSubnetFlags: u32 {
        const ENABLE_BROADCAST = 0x01;
        const RESERVE_NETWORK_ADDRESS = 0x02;
    }
}

/// Network settings handed to the host
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkDocument {
    pub name: String,
    #[serde(serialize_with = "network_flag_bits")]
    pub flags: NetworkFlags,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "IPv6")]
    pub ipv6: bool,
    pub isolate_switch: bool,
    pub max_concurrent_endpoints: u32,
    pub subnets: Vec<Subnet>,
    pub mac_pools: Vec<MacPool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    #[serde(rename = "ID", serialize_with = "upper_guid")]
    pub id: Uuid,
    pub object_type: u32,
    pub address_prefix: String,
    pub gateway_address: String,
    pub ip_subnets: Vec<IpSubnet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpSubnet {
    #[serde(rename = "ID", serialize_with = "upper_guid")]
    pub id: Uuid,
    #[serde(serialize_with = "ip_subnet_flag_bits")]
    pub flags: IpSubnetFlags,
    pub ip_address_prefix: String,
    pub object_type: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MacPool {
    pub end_mac_address: String,
    pub start_mac_address: String,
}

impl NetworkDocument {
    /// Build the WSL network document for a derived block
    pub fn for_block(block: &DerivedBlock) -> Self {
        let prefix = block.subnet_prefix();

        Self {
            name: "WSL".to_string(),
            flags: NetworkFlags::ENABLE_DNS_PROXY | NetworkFlags::ISOLATE_VSWITCH,
            kind: "ICS".to_string(),
            ipv6: false,
            isolate_switch: true,
            max_concurrent_endpoints: 1,
            subnets: vec![Subnet {
                id: SUBNET_ID,
                object_type: SUBNET_OBJECT_TYPE,
                address_prefix: prefix.clone(),
                gateway_address: block.gateway.to_string(),
                ip_subnets: vec![IpSubnet {
                    id: IP_SUBNET_ID,
                    flags: IpSubnetFlags::ENABLE_BROADCAST
                        | IpSubnetFlags::RESERVE_NETWORK_ADDRESS,
                    ip_address_prefix: prefix,
                    object_type: IP_SUBNET_OBJECT_TYPE,
                }],
            }],
            mac_pools: vec![MacPool {
                end_mac_address: MAC_POOL_END.to_string(),
                start_mac_address: MAC_POOL_START.to_string(),
            }],
        }
    }

    /// Compact JSON as passed to the host
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON for display
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn upper_guid<S: Serializer>(id: &Uuid, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:X}", id))
}

fn network_flag_bits<S: Serializer>(
    flags: &NetworkFlags,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u32(flags.bits())
}

fn ip_subnet_flag_bits<S: Serializer>(
    flags: &IpSubnetFlags,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u32(flags.bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::DottedQuad;
    use serde_json::Value;

    fn document_for(a: u32, b: u32, c: u32, d: u32) -> Value {
        let block = DerivedBlock::derive(DottedQuad::new(a, b, c, d));
        let json = NetworkDocument::for_block(&block).to_json().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_prefixes_use_network_address() {
        let doc = document_for(10, 0, 5, 7);
        let subnet = &doc["Subnets"][0];

        assert_eq!(subnet["AddressPrefix"], "10.0.5.0/24");
        assert_eq!(subnet["GatewayAddress"], "10.0.5.1");
        assert_eq!(subnet["IpSubnets"][0]["IpAddressPrefix"], "10.0.5.0/24");
    }

    #[test]
    fn test_fixed_fields() {
        let doc = document_for(192, 168, 222, 222);

        assert_eq!(doc["Name"], "WSL");
        assert_eq!(doc["Flags"], 9);
        assert_eq!(doc["Type"], "ICS");
        assert_eq!(doc["IPv6"], false);
        assert_eq!(doc["IsolateSwitch"], true);
        assert_eq!(doc["MaxConcurrentEndpoints"], 1);
        assert_eq!(doc["Subnets"].as_array().unwrap().len(), 1);
        assert_eq!(doc["MacPools"][0]["StartMacAddress"], "00-15-5D-52-C0-00");
        assert_eq!(doc["MacPools"][0]["EndMacAddress"], "00-15-5D-52-C0-FF");
    }

    #[test]
    fn test_subnet_objects() {
        let doc = document_for(192, 168, 222, 222);
        let subnet = &doc["Subnets"][0];
        let ip_subnet = &subnet["IpSubnets"][0];

        assert_eq!(subnet["ID"], "FC437E99-2063-4433-A1FA-F4D17BD55C92");
        assert_eq!(subnet["ObjectType"], 5);
        assert_eq!(ip_subnet["ID"], "4D120505-4222-4CB2-8C53-DC0F70049696");
        assert_eq!(ip_subnet["Flags"], 3);
        assert_eq!(ip_subnet["ObjectType"], 6);
    }
}
