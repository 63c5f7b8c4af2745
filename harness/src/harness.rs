//! Deploy, invoke and call against the simulated chain.

use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use aggregator_proxy::AggregatorProxy;
use feed_common::FeedError;
use sequencer_uptime_feed::SequencerUptimeFeed;
use soroban_sdk::testutils::{Address as _, MockAuth, MockAuthInvoke};
use soroban_sdk::{Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec};
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::rejection::Rejection;

/// Entry point every deployable contract is initialized through.
const INITIALIZER: &str = "initialize";

/// A contract the harness knows how to instantiate natively.
struct ContractSpec {
    name: &'static str,
    /// Initializer parameters, in call order.
    params: &'static [&'static str],
    /// Parameter naming the owner, who signs the initializer.
    owner_param: &'static str,
    register: fn(&Env) -> Address,
}

fn register_uptime_feed(env: &Env) -> Address {
    env.register(SequencerUptimeFeed, ())
}

fn register_proxy(env: &Env) -> Address {
    env.register(AggregatorProxy, ())
}

const CONTRACTS: &[ContractSpec] = &[
    ContractSpec {
        name: "sequencer_uptime_feed",
        params: &["initial_status", "owner_address"],
        owner_param: "owner_address",
        register: register_uptime_feed,
    },
    ContractSpec {
        name: "proxy",
        params: &["owner", "address"],
        owner_param: "owner",
        register: register_proxy,
    },
];

/// Names accepted by [`Harness::deploy`].
pub const CONTRACT_NAMES: &[&str] = &["sequencer_uptime_feed", "proxy"];

fn find_spec(name: &str) -> Option<&'static ContractSpec> {
    CONTRACTS.iter().find(|spec| spec.name == name)
}

/// Start of the test process. Every harness in the process counts its
/// deadline from here.
fn suite_started() -> Instant {
    static STARTED: OnceLock<Instant> = OnceLock::new();
    *STARTED.get_or_init(Instant::now)
}

/// An identity able to authorize requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signer {
    label: String,
    address: Address,
}

impl Signer {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Who a read is issued as.
#[derive(Clone, Copy, Debug)]
pub enum Caller<'a> {
    /// Authorized by this signer.
    Signer(&'a Signer),
    /// No authorization at all. Entry points that need a caller reject it.
    Unsigned,
}

impl fmt::Display for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Signer(signer) => f.write_str(signer.label()),
            Caller::Unsigned => f.write_str("<unsigned>"),
        }
    }
}

/// A deployed contract instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployed {
    name: String,
    address: Address,
}

impl Deployed {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Named initializer arguments.
#[derive(Clone)]
pub struct ConstructorArgs {
    env: Env,
    entries: std::vec::Vec<(String, Val)>,
}

impl ConstructorArgs {
    pub fn set<V: IntoVal<Env, Val>>(mut self, key: &str, value: V) -> Self {
        let value = value.into_val(&self.env);
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    /// Orders the values by `params`; every parameter must be given exactly.
    fn ordered(&self, params: &[&str]) -> std::result::Result<Vec<Val>, String> {
        if let Some((unknown, _)) = self
            .entries
            .iter()
            .find(|(name, _)| !params.contains(&name.as_str()))
        {
            return Err(format!("unexpected constructor argument `{unknown}`"));
        }

        let mut args = Vec::new(&self.env);
        for param in params {
            let (_, value) = self
                .entries
                .iter()
                .find(|(name, _)| name == param)
                .ok_or_else(|| format!("missing constructor argument `{param}`"))?;
            args.push_back(*value);
        }
        Ok(args)
    }

    fn value(&self, key: &str) -> Option<Val> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| *value)
    }

    /// Values in insertion order, for contracts without a known layout.
    fn positional(&self) -> Vec<Val> {
        let mut args = Vec::new(&self.env);
        for (_, value) in &self.entries {
            args.push_back(*value);
        }
        args
    }
}

/// A fresh simulated chain plus the configuration it was built from.
///
/// `timeout_ms` bounds the whole test process, not a single harness.
pub struct Harness {
    env: Env,
    config: HarnessConfig,
    started: Instant,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        info!(
            network = %config.network.name,
            url = %config.network.url,
            timeout_ms = config.timeout_ms,
            "provisioning simulated chain"
        );
        Self {
            env: Env::default(),
            config,
            started: suite_started(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Provisions a signer with the given label.
    pub fn provision_signer(&self, label: &str) -> Signer {
        let signer = Signer {
            label: label.to_string(),
            address: Address::generate(&self.env),
        };
        debug!(label, "provisioned signer");
        signer
    }

    /// Provisions a signer from a configured wallet binding.
    pub fn deploy_account(&self, wallet: &str) -> Result<Signer> {
        self.ensure_within_deadline()?;
        let binding = self.config.wallet(wallet)?;
        Ok(self.provision_signer(&binding.account_name))
    }

    pub fn constructor_args(&self) -> ConstructorArgs {
        ConstructorArgs {
            env: self.env.clone(),
            entries: std::vec::Vec::new(),
        }
    }

    /// Converts a tuple of arguments into the list a request carries.
    pub fn args<A: IntoVal<Env, Vec<Val>>>(&self, args: A) -> Vec<Val> {
        args.into_val(&self.env)
    }

    /// Instantiates a known contract and runs its initializer.
    pub fn deploy(&self, contract_name: &str, args: ConstructorArgs) -> Result<Deployed> {
        self.ensure_within_deadline()?;

        let spec = find_spec(contract_name).ok_or_else(|| HarnessError::Deployment {
            contract: contract_name.to_string(),
            message: format!("unknown contract, expected one of {CONTRACT_NAMES:?}"),
        })?;
        let ordered = args.ordered(spec.params).map_err(|message| HarnessError::Deployment {
            contract: contract_name.to_string(),
            message,
        })?;

        let owner = self.owner_of(&args, spec.owner_param);
        let address = (spec.register)(&self.env);
        self.initialize(contract_name, address, owner, ordered)
    }

    /// Instantiates a compiled artifact from the configured artifact
    /// directory and runs its initializer.
    pub fn deploy_artifact(&self, contract_name: &str, args: ConstructorArgs) -> Result<Deployed> {
        self.ensure_within_deadline()?;

        let path = self.config.artifact_path(contract_name);
        let wasm = std::fs::read(&path).map_err(|err| HarnessError::Deployment {
            contract: contract_name.to_string(),
            message: format!("cannot read artifact {}: {err}", path.display()),
        })?;

        let spec = find_spec(contract_name);
        let ordered = match spec {
            Some(spec) => args.ordered(spec.params),
            None => Ok(args.positional()),
        }
        .map_err(|message| HarnessError::Deployment {
            contract: contract_name.to_string(),
            message,
        })?;
        let owner = spec.and_then(|spec| self.owner_of(&args, spec.owner_param));

        let address = self.env.register(wasm.as_slice(), ());
        self.initialize(contract_name, address, owner, ordered)
    }

    /// State-changing request authorized by `signer` alone.
    pub fn invoke(
        &self,
        signer: &Signer,
        contract: &Deployed,
        entry_point: &str,
        args: Vec<Val>,
    ) -> Result<Val> {
        self.ensure_within_deadline()?;
        debug!(signer = signer.label(), contract = contract.name(), entry_point, "invoke");

        self.authorize(Some(signer.address()), contract, entry_point, &args);
        self.dispatch(contract, entry_point, args)
    }

    /// Read request issued as `caller`.
    pub fn call(
        &self,
        caller: Caller<'_>,
        contract: &Deployed,
        entry_point: &str,
        args: Vec<Val>,
    ) -> Result<Val> {
        self.ensure_within_deadline()?;
        debug!(%caller, contract = contract.name(), entry_point, "call");

        let signer = match caller {
            Caller::Signer(signer) => Some(signer.address()),
            Caller::Unsigned => None,
        };
        self.authorize(signer, contract, entry_point, &args);
        self.dispatch(contract, entry_point, args)
    }

    /// [`Harness::call`] followed by [`Harness::decode`].
    pub fn query<T>(
        &self,
        caller: Caller<'_>,
        contract: &Deployed,
        entry_point: &str,
        args: Vec<Val>,
    ) -> Result<T>
    where
        T: TryFromVal<Env, Val>,
    {
        let value = self.call(caller, contract, entry_point, args)?;
        self.decode(value)
    }

    pub fn decode<T>(&self, value: Val) -> Result<T>
    where
        T: TryFromVal<Env, Val>,
    {
        T::try_from_val(&self.env, &value).map_err(|_| HarnessError::Decode {
            type_name: std::any::type_name::<T>(),
        })
    }

    fn owner_of(&self, args: &ConstructorArgs, owner_param: &str) -> Option<Address> {
        let value = args.value(owner_param)?;
        Address::try_from_val(&self.env, &value).ok()
    }

    /// Runs the initializer, signed by `owner` when one is known.
    fn initialize(
        &self,
        contract_name: &str,
        address: Address,
        owner: Option<Address>,
        args: Vec<Val>,
    ) -> Result<Deployed> {
        let deployed = Deployed {
            name: contract_name.to_string(),
            address,
        };

        self.authorize(owner.as_ref(), &deployed, INITIALIZER, &args);
        match self.dispatch(&deployed, INITIALIZER, args) {
            Ok(_) => {
                info!(contract = contract_name, address = ?deployed.address, "deployed");
                Ok(deployed)
            }
            Err(HarnessError::Rejected(rejection)) => Err(HarnessError::Deployment {
                contract: contract_name.to_string(),
                message: rejection.message,
            }),
            Err(other) => Err(other),
        }
    }

    /// Replaces any previous authorization with exactly one entry for
    /// `signer`, or none at all.
    fn authorize(&self, signer: Option<&Address>, contract: &Deployed, entry_point: &str, args: &Vec<Val>) {
        match signer {
            Some(signer) => {
                self.env.mock_auths(&[MockAuth {
                    address: signer,
                    invoke: &MockAuthInvoke {
                        contract: &contract.address,
                        fn_name: entry_point,
                        args: args.clone(),
                        sub_invokes: &[],
                    },
                }]);
            }
            None => self.env.set_auths(&[]),
        }
    }

    fn dispatch(&self, contract: &Deployed, entry_point: &str, args: Vec<Val>) -> Result<Val> {
        let func = Symbol::new(&self.env, entry_point);
        match self
            .env
            .try_invoke_contract::<Val, FeedError>(&contract.address, &func, args)
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(HarnessError::Decode {
                type_name: std::any::type_name::<Val>(),
            }),
            Err(Ok(error)) => {
                debug!(contract = contract.name(), entry_point, reason = error.reason(), "rejected");
                Err(HarnessError::Rejected(Rejection::from_contract(error)))
            }
            Err(Err(error)) => {
                let rejection = Rejection::from_invoke(error.into());
                debug!(contract = contract.name(), entry_point, reason = %rejection, "rejected");
                Err(HarnessError::Rejected(rejection))
            }
        }
    }

    fn ensure_within_deadline(&self) -> Result<()> {
        let elapsed = self.started.elapsed();
        if elapsed.as_millis() >= u128::from(self.config.timeout_ms) {
            return Err(HarnessError::Timeout {
                elapsed_ms: elapsed.as_millis(),
                limit_ms: self.config.timeout_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> Harness {
        Harness::new(HarnessConfig::default())
    }

    #[test]
    fn test_deploy_unknown_contract() {
        let harness = harness();

        let result = harness.deploy("aggregator", harness.constructor_args());
        assert!(matches!(
            result,
            Err(HarnessError::Deployment { contract, .. }) if contract == "aggregator"
        ));
    }

    #[test]
    fn test_deploy_checks_argument_names() {
        let harness = harness();
        let owner = harness.provision_signer("owner");

        let missing = harness.constructor_args().set("initial_status", 0u32);
        match harness.deploy("sequencer_uptime_feed", missing) {
            Err(HarnessError::Deployment { message, .. }) => {
                assert!(message.contains("owner_address"))
            }
            other => panic!("unexpected result {other:?}"),
        }

        let extra = harness
            .constructor_args()
            .set("initial_status", 0u32)
            .set("owner_address", owner.address().clone())
            .set("bogus", 1u32);
        match harness.deploy("sequencer_uptime_feed", extra) {
            Err(HarnessError::Deployment { message, .. }) => assert!(message.contains("bogus")),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_constructor_args_overwrite() {
        let harness = harness();
        let owner = harness.provision_signer("owner");

        let args = harness
            .constructor_args()
            .set("initial_status", 1u32)
            .set("owner_address", owner.address().clone())
            .set("initial_status", 0u32);

        let ordered = args.ordered(&["initial_status", "owner_address"]).unwrap();
        assert_eq!(ordered.len(), 2);
        let status: u32 = harness.decode(ordered.get(0).unwrap()).unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_deploy_artifact_missing_file() {
        let harness = harness();

        let result = harness.deploy_artifact("proxy", harness.constructor_args());
        assert!(matches!(result, Err(HarnessError::Deployment { .. })));
    }

    #[test]
    fn test_expired_deadline() {
        let config = HarnessConfig {
            timeout_ms: 0,
            ..HarnessConfig::default()
        };
        let harness = Harness::new(config);

        let result = harness.deploy("proxy", harness.constructor_args());
        assert!(matches!(result, Err(HarnessError::Timeout { limit_ms: 0, .. })));
        assert!(matches!(
            harness.deploy_account(crate::DEFAULT_WALLET),
            Err(HarnessError::Timeout { .. })
        ));
    }

    #[test]
    fn test_deadline_spans_every_harness() {
        let config = HarnessConfig {
            timeout_ms: 30,
            ..HarnessConfig::default()
        };
        let first = Harness::new(config.clone());
        std::thread::sleep(std::time::Duration::from_millis(40));
        assert!(matches!(
            first.deploy_account(crate::DEFAULT_WALLET),
            Err(HarnessError::Timeout { limit_ms: 30, .. })
        ));

        let second = Harness::new(config);
        assert!(matches!(
            second.deploy_account(crate::DEFAULT_WALLET),
            Err(HarnessError::Timeout { limit_ms: 30, .. })
        ));
    }

    #[test]
    fn test_contract_names_match_table() {
        let names: std::vec::Vec<&str> = CONTRACTS.iter().map(|spec| spec.name).collect();
        assert_eq!(names, CONTRACT_NAMES);
        for spec in CONTRACTS {
            assert!(spec.params.contains(&spec.owner_param));
        }
    }

    #[test]
    fn test_deploy_signs_as_owner() {
        let harness = harness();
        let owner = harness.provision_signer("owner");

        let args = harness
            .constructor_args()
            .set("initial_status", 0u32)
            .set("owner_address", owner.address().clone());
        let feed = harness.deploy("sequencer_uptime_feed", args).unwrap();

        let stored: Address = harness
            .query(Caller::Unsigned, &feed, "owner", Vec::new(harness.env()))
            .unwrap();
        assert_eq!(&stored, owner.address());
    }

    #[test]
    fn test_signers_are_distinct() {
        let harness = harness();

        let a = harness.provision_signer("a");
        let b = harness.provision_signer("b");
        assert_ne!(a.address(), b.address());
        assert_eq!(a.label(), "a");

        let account = harness.deploy_account(crate::DEFAULT_WALLET).unwrap();
        assert_eq!(account.label(), "default");
    }
}
