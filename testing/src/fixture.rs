use std::sync::Arc;
use thrivcore::{
    ac::{
        Agent,
        Role,
    },
    platform::{
        RDPlatform,
        SIPlatform,
    },
    resource::ResourceData,
};
use thrivctrl::platform::{
    Builder,
    Platform,
};
use thrivdb::Backend;

pub const OWNER1: &str = "owner1@example.com";
pub const OWNER2: &str = "owner2@example.com";

/// A populated directory of sixteen resources.
///
/// Resource `n` (from 1) is approved when `n` is even, private when
/// `ceil(n/2)` is even, belongs to the first institution when `ceil(n/4)`
/// is even and to the second otherwise, and is owned by `OWNER1` when
/// `ceil(n/8)` is even and by `OWNER2` otherwise.  Resources 13 and up are
/// in the clinical segment, every third resource is a core facility.
pub struct Directory {
    pub platform: Platform,
    pub rd: Arc<dyn RDPlatform>,
    pub si: Arc<dyn SIPlatform>,
    pub admin: Agent,
    /// Users affiliated with the first and second institution.
    pub i1_user: Agent,
    pub i2_user: Agent,
    pub owner1: Agent,
    pub owner2: Agent,
    pub institutions: [i64; 2],
    pub segments: [i64; 2],
    pub types: [i64; 2],
    /// Resource ids, `resources[n - 1]` being resource `n`.
    pub resources: Vec<i64>,
}

fn ceil_div(n: usize, d: usize) -> usize {
    n.div_ceil(d)
}

pub async fn sqlite_backends() -> anyhow::Result<(Arc<dyn RDPlatform>, Arc<dyn SIPlatform>)> {
    let rd = Backend::rd("sqlite::memory:").await
        .map_err(|e| anyhow::anyhow!(e))?;
    let si = Backend::si("sqlite::memory:").await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok((rd, si))
}

pub async fn create_sqlite_platform() -> anyhow::Result<Platform> {
    let (rd, si) = sqlite_backends().await?;
    Ok(Builder::new()
        .arc_rd_platform(rd)
        .arc_si_platform(si)
        .build()?)
}

impl Directory {
    pub async fn new() -> anyhow::Result<Self> {
        let (rd, si) = sqlite_backends().await?;
        let platform = Builder::new()
            .arc_rd_platform(rd.clone())
            .arc_si_platform(si.clone())
            .build()?;
        Self::populate(platform, rd, si).await
    }

    /// A new platform sharing this directory's stores, for swapping in
    /// alternative collaborators.
    pub fn builder(&self) -> Builder {
        Builder::new()
            .arc_rd_platform(self.rd.clone())
            .arc_si_platform(self.si.clone())
    }

    async fn populate(
        platform: Platform,
        rd: Arc<dyn RDPlatform>,
        si: Arc<dyn SIPlatform>,
    ) -> anyhow::Result<Self> {
        let admin = Agent::from(platform.create_user("admin@example.com", "Admin", Role::Admin).await?);
        let institutions = [
            platform.add_institution("Institution One", Some("i1.example.edu"), None, false, &admin).await?.id,
            platform.add_institution("Institution Two", Some("i2.example.edu"), None, false, &admin).await?.id,
        ];
        let segments = [
            platform.add_segment("Research", None, &admin).await?.id,
            platform.add_segment("Clinical", None, &admin).await?.id,
        ];
        let types = [
            platform.add_type("Software", None, &admin).await?.id,
            platform.add_type("Core Facility", None, &admin).await?.id,
        ];
        let i1_user = Agent::from(platform.create_user("user@i1.example.edu", "User One", Role::User).await?);
        let i2_user = Agent::from(platform.create_user("user@i2.example.edu", "User Two", Role::User).await?);
        let owner1 = Agent::from(platform.create_user(OWNER1, "Owner One", Role::User).await?);
        let owner2 = Agent::from(platform.create_user(OWNER2, "Owner Two", Role::User).await?);

        let mut resources = Vec::new();
        for n in 1..=16usize {
            let data = ResourceData {
                name: Some(format!("Resource {n:02}")),
                description: Some(Some(format!("Sample resource number {n}"))),
                website: Some(Some(format!("https://example.com/resource/{n}"))),
                owner: Some(Some(if ceil_div(n, 8) % 2 == 0 { OWNER1 } else { OWNER2 }.to_string())),
                approved: Some(if n % 2 == 0 { "Approved" } else { "Unapproved" }.to_string()),
                private: Some(ceil_div(n, 2) % 2 == 0),
                institution_id: Some(Some(institutions[if ceil_div(n, 4) % 2 == 0 { 0 } else { 1 }])),
                type_id: Some(Some(types[if n % 3 == 0 { 1 } else { 0 }])),
                segment_id: Some(segments[if n > 12 { 1 } else { 0 }]),
                ..Default::default()
            };
            resources.push(platform.create_resource(&data, &admin).await?.into_result()?.id);
        }

        Ok(Self {
            platform,
            rd,
            si,
            admin,
            i1_user,
            i2_user,
            owner1,
            owner2,
            institutions,
            segments,
            types,
            resources,
        })
    }

    pub fn resource(&self, n: usize) -> i64 {
        self.resources[n - 1]
    }
}
