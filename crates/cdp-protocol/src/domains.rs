//! Static domain/command schema table.
//!
//! One table, derived once from the protocol schema, replaces per-domain
//! generated wrapper classes: each command lists its parameter names and
//! whether they are required, and a single generic assembly path
//! ([`CommandSpec::build_params`]) filters optional parameters and rejects
//! malformed calls before anything touches the wire.

use serde_json::{Map, Value};
use thiserror::Error;

/// Schema violations caught before a command is sent.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("{method}: missing required parameter '{name}'")]
    MissingParam { method: String, name: String },

    #[error("{method}: unknown parameter '{name}'")]
    UnknownParam { method: String, name: String },
}

/// One command parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
}

/// One protocol command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Fully qualified method name, e.g. `"Page.navigate"`.
    pub method: &'static str,
    pub params: &'static [ParamSpec],
}

/// One protocol domain: its commands and the events it emits.
#[derive(Debug, Clone, Copy)]
pub struct DomainSpec {
    pub name: &'static str,
    pub commands: &'static [CommandSpec],
    /// Fully qualified event names.
    pub events: &'static [&'static str],
}

const fn req(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        required: false,
    }
}

/// Method names the connection core itself special-cases.
pub mod methods {
    pub const ATTACH_TO_TARGET: &str = "Target.attachToTarget";
    pub const DETACH_FROM_TARGET: &str = "Target.detachFromTarget";
    pub const CREATE_TARGET: &str = "Target.createTarget";
    pub const CLOSE_TARGET: &str = "Target.closeTarget";
    pub const ATTACHED_TO_TARGET: &str = "Target.attachedToTarget";
    pub const DETACHED_FROM_TARGET: &str = "Target.detachedFromTarget";
}

pub static DOMAINS: &[DomainSpec] = &[
    DomainSpec {
        name: "Target",
        commands: &[
            CommandSpec {
                method: "Target.activateTarget",
                params: &[req("targetId")],
            },
            CommandSpec {
                method: "Target.attachToTarget",
                params: &[req("targetId"), opt("flatten")],
            },
            CommandSpec {
                method: "Target.closeTarget",
                params: &[req("targetId")],
            },
            CommandSpec {
                method: "Target.createTarget",
                params: &[
                    req("url"),
                    opt("width"),
                    opt("height"),
                    opt("browserContextId"),
                    opt("newWindow"),
                    opt("background"),
                ],
            },
            CommandSpec {
                method: "Target.detachFromTarget",
                params: &[opt("sessionId")],
            },
            CommandSpec {
                method: "Target.getTargets",
                params: &[],
            },
            CommandSpec {
                method: "Target.setDiscoverTargets",
                params: &[req("discover")],
            },
        ],
        events: &[
            "Target.attachedToTarget",
            "Target.detachedFromTarget",
            "Target.receivedMessageFromTarget",
            "Target.targetCreated",
            "Target.targetDestroyed",
            "Target.targetInfoChanged",
        ],
    },
    DomainSpec {
        name: "Page",
        commands: &[
            CommandSpec {
                method: "Page.enable",
                params: &[],
            },
            CommandSpec {
                method: "Page.disable",
                params: &[],
            },
            CommandSpec {
                method: "Page.navigate",
                params: &[
                    req("url"),
                    opt("referrer"),
                    opt("transitionType"),
                    opt("frameId"),
                ],
            },
            CommandSpec {
                method: "Page.reload",
                params: &[opt("ignoreCache"), opt("scriptToEvaluateOnLoad")],
            },
            CommandSpec {
                method: "Page.captureScreenshot",
                params: &[opt("format"), opt("quality"), opt("clip"), opt("fromSurface")],
            },
            CommandSpec {
                method: "Page.getNavigationHistory",
                params: &[],
            },
            CommandSpec {
                method: "Page.navigateToHistoryEntry",
                params: &[req("entryId")],
            },
        ],
        events: &[
            "Page.domContentEventFired",
            "Page.loadEventFired",
            "Page.frameAttached",
            "Page.frameDetached",
            "Page.frameNavigated",
            "Page.frameStartedLoading",
            "Page.frameStoppedLoading",
            "Page.javascriptDialogClosed",
            "Page.javascriptDialogOpening",
            "Page.lifecycleEvent",
            "Page.navigatedWithinDocument",
            "Page.windowOpen",
        ],
    },
    DomainSpec {
        name: "Runtime",
        commands: &[
            CommandSpec {
                method: "Runtime.enable",
                params: &[],
            },
            CommandSpec {
                method: "Runtime.disable",
                params: &[],
            },
            CommandSpec {
                method: "Runtime.evaluate",
                params: &[
                    req("expression"),
                    opt("objectGroup"),
                    opt("includeCommandLineAPI"),
                    opt("silent"),
                    opt("contextId"),
                    opt("returnByValue"),
                    opt("awaitPromise"),
                ],
            },
            CommandSpec {
                method: "Runtime.callFunctionOn",
                params: &[
                    req("functionDeclaration"),
                    opt("objectId"),
                    opt("arguments"),
                    opt("returnByValue"),
                    opt("awaitPromise"),
                ],
            },
            CommandSpec {
                method: "Runtime.releaseObject",
                params: &[req("objectId")],
            },
        ],
        events: &[
            "Runtime.consoleAPICalled",
            "Runtime.exceptionRevoked",
            "Runtime.exceptionThrown",
            "Runtime.executionContextCreated",
            "Runtime.executionContextDestroyed",
            "Runtime.executionContextsCleared",
            "Runtime.inspectRequested",
        ],
    },
    DomainSpec {
        name: "DOM",
        commands: &[
            CommandSpec {
                method: "DOM.enable",
                params: &[],
            },
            CommandSpec {
                method: "DOM.disable",
                params: &[],
            },
            CommandSpec {
                method: "DOM.getDocument",
                params: &[opt("depth"), opt("pierce")],
            },
            CommandSpec {
                method: "DOM.querySelector",
                params: &[req("nodeId"), req("selector")],
            },
            CommandSpec {
                method: "DOM.querySelectorAll",
                params: &[req("nodeId"), req("selector")],
            },
            CommandSpec {
                method: "DOM.resolveNode",
                params: &[opt("nodeId"), opt("backendNodeId"), opt("objectGroup")],
            },
            CommandSpec {
                method: "DOM.focus",
                params: &[opt("nodeId"), opt("backendNodeId"), opt("objectId")],
            },
            CommandSpec {
                method: "DOM.getBoxModel",
                params: &[opt("nodeId"), opt("backendNodeId"), opt("objectId")],
            },
        ],
        events: &[
            "DOM.documentUpdated",
            "DOM.setChildNodes",
            "DOM.attributeModified",
            "DOM.attributeRemoved",
            "DOM.childNodeCountUpdated",
            "DOM.childNodeInserted",
            "DOM.childNodeRemoved",
        ],
    },
    DomainSpec {
        name: "Network",
        commands: &[
            CommandSpec {
                method: "Network.enable",
                params: &[
                    opt("maxTotalBufferSize"),
                    opt("maxResourceBufferSize"),
                    opt("maxPostDataSize"),
                ],
            },
            CommandSpec {
                method: "Network.disable",
                params: &[],
            },
            CommandSpec {
                method: "Network.setCacheDisabled",
                params: &[req("cacheDisabled")],
            },
        ],
        events: &[
            "Network.requestWillBeSent",
            "Network.responseReceived",
            "Network.loadingFinished",
            "Network.loadingFailed",
        ],
    },
    DomainSpec {
        name: "Input",
        commands: &[
            CommandSpec {
                method: "Input.dispatchKeyEvent",
                params: &[
                    req("type"),
                    opt("modifiers"),
                    opt("timestamp"),
                    opt("text"),
                    opt("unmodifiedText"),
                    opt("key"),
                    opt("code"),
                    opt("windowsVirtualKeyCode"),
                    opt("nativeVirtualKeyCode"),
                    opt("autoRepeat"),
                    opt("location"),
                ],
            },
            CommandSpec {
                method: "Input.dispatchMouseEvent",
                params: &[
                    req("type"),
                    req("x"),
                    req("y"),
                    opt("modifiers"),
                    opt("timestamp"),
                    opt("button"),
                    opt("clickCount"),
                    opt("deltaX"),
                    opt("deltaY"),
                ],
            },
            CommandSpec {
                method: "Input.dispatchTouchEvent",
                params: &[req("type"), req("touchPoints"), opt("modifiers"), opt("timestamp")],
            },
            CommandSpec {
                method: "Input.insertText",
                params: &[req("text")],
            },
            CommandSpec {
                method: "Input.setIgnoreInputEvents",
                params: &[req("ignore")],
            },
        ],
        events: &[],
    },
    DomainSpec {
        name: "Log",
        commands: &[
            CommandSpec {
                method: "Log.enable",
                params: &[],
            },
            CommandSpec {
                method: "Log.disable",
                params: &[],
            },
            CommandSpec {
                method: "Log.clear",
                params: &[],
            },
        ],
        events: &["Log.entryAdded"],
    },
    DomainSpec {
        name: "Browser",
        commands: &[
            CommandSpec {
                method: "Browser.getVersion",
                params: &[],
            },
            CommandSpec {
                method: "Browser.close",
                params: &[],
            },
        ],
        events: &[],
    },
    DomainSpec {
        name: "Database",
        commands: &[
            CommandSpec {
                method: "Database.enable",
                params: &[],
            },
            CommandSpec {
                method: "Database.disable",
                params: &[],
            },
            CommandSpec {
                method: "Database.executeSQL",
                params: &[req("databaseId"), req("query")],
            },
            CommandSpec {
                method: "Database.getDatabaseTableNames",
                params: &[req("databaseId")],
            },
        ],
        events: &["Database.addDatabase"],
    },
    DomainSpec {
        name: "Storage",
        commands: &[
            CommandSpec {
                method: "Storage.clearDataForOrigin",
                params: &[req("origin"), req("storageTypes")],
            },
            CommandSpec {
                method: "Storage.getUsageAndQuota",
                params: &[req("origin")],
            },
            CommandSpec {
                method: "Storage.trackCacheStorageForOrigin",
                params: &[req("origin")],
            },
            CommandSpec {
                method: "Storage.trackIndexedDBForOrigin",
                params: &[req("origin")],
            },
            CommandSpec {
                method: "Storage.untrackCacheStorageForOrigin",
                params: &[req("origin")],
            },
            CommandSpec {
                method: "Storage.untrackIndexedDBForOrigin",
                params: &[req("origin")],
            },
        ],
        events: &[],
    },
    DomainSpec {
        name: "Security",
        commands: &[
            CommandSpec {
                method: "Security.enable",
                params: &[],
            },
            CommandSpec {
                method: "Security.disable",
                params: &[],
            },
        ],
        events: &["Security.securityStateChanged", "Security.certificateError"],
    },
    DomainSpec {
        name: "SystemInfo",
        commands: &[CommandSpec {
            method: "SystemInfo.getInfo",
            params: &[],
        }],
        events: &[],
    },
    DomainSpec {
        name: "Schema",
        commands: &[CommandSpec {
            method: "Schema.getDomains",
            params: &[],
        }],
        events: &[],
    },
];

/// Look up a domain by name.
pub fn domain(name: &str) -> Option<&'static DomainSpec> {
    DOMAINS.iter().find(|d| d.name == name)
}

/// Look up a command by fully qualified method name.
pub fn command(method: &str) -> Option<&'static CommandSpec> {
    let domain_name = method.split('.').next()?;
    domain(domain_name)?
        .commands
        .iter()
        .find(|c| c.method == method)
}

/// Whether `event` is a known notification name.
pub fn is_known_event(event: &str) -> bool {
    let Some(domain_name) = event.split('.').next() else {
        return false;
    };
    domain(domain_name).is_some_and(|d| d.events.contains(&event))
}

impl CommandSpec {
    /// Assemble a params object from `(name, value)` pairs.
    ///
    /// `None` values are dropped (optional-parameter filtering); a `None` for
    /// a required parameter, or a name the schema does not list, is an error.
    pub fn build_params(
        &self,
        args: &[(&str, Option<Value>)],
    ) -> Result<Map<String, Value>, SchemaError> {
        let mut map = Map::new();
        for (name, value) in args {
            if !self.params.iter().any(|p| p.name == *name) {
                return Err(SchemaError::UnknownParam {
                    method: self.method.to_string(),
                    name: (*name).to_string(),
                });
            }
            if let Some(value) = value {
                map.insert((*name).to_string(), value.clone());
            }
        }
        for param in self.params.iter().filter(|p| p.required) {
            if !map.contains_key(param.name) {
                return Err(SchemaError::MissingParam {
                    method: self.method.to_string(),
                    name: param.name.to_string(),
                });
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
#[path = "domains_tests.rs"]
mod tests;
