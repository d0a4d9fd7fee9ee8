//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    function initRiverV1(
        address depositContractAddress,
        bytes32 withdrawalCredentials,
        address systemAdministratorAddress,
        address allowlistAdminAddress,
        address treasuryAddress,
        uint256 globalFee,
        uint256 operatorRewardsShare
    ) external;
}

sol! {
    #[sol(rpc)]
    interface ITUPProxy {
        function upgradeTo(address newImplementation) external;
    }
}
